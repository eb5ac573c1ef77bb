//! # Tipfeed Core
//!
//! Pure primitives for tipfeed: documents, addresses, comments, and
//! signed-message verification.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over identity strings and cryptographic data.
//!
//! ## Key Types
//!
//! - [`DocumentId`] - Content fingerprint identifying a document
//! - [`Address`] - Network-specific identity string for a signing key
//! - [`Network`] - Signature/address-format variant (main vs test)
//! - [`Comment`] - An immutable comment in a document's feed
//! - [`DocumentTips`] - A document's declared sources and tip set
//!
//! ## Signature Verification
//!
//! [`verify_signed_message`] checks a detached signed-message signature
//! against a claimed address. It is fail-closed: malformed input is a
//! non-match, never a panic or an error.

pub mod error;
pub mod signature;
pub mod types;

pub use error::CoreError;
pub use signature::verify_signed_message;
pub use types::{Address, Comment, DocumentId, DocumentTips, Network, Tip};
