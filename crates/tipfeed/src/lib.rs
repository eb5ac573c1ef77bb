//! # Tipfeed
//!
//! The unified API for tipfeed - per-document comment feeds gated behind
//! proof of address ownership and proof of tipping.
//!
//! ## Overview
//!
//! A requester earns access to a document's comment feed by proving two
//! facts:
//!
//! - **Ownership**: they control a cryptocurrency address, proven through
//!   an external signed-challenge subsystem (the address oracle)
//! - **Tipping**: that address has placed a qualifying tip against the
//!   document, verified through an external ledger lookup (the tip oracle)
//!
//! [`CommentService`] orchestrates the gate, the write limiter, the
//! signed-message verifier and the comment store into four operations:
//! verify, count (single and batch), list, and post.
//!
//! ## Key Concepts
//!
//! - **Fail-closed**: any oracle failure, missing network context, or
//!   unverifiable signature resolves to a denial, never an implicit grant.
//! - **Denials are values**: terminal outcomes ([`DenyReason`]) are
//!   returned as tagged variants; only oracle and store faults are errors.
//! - **No caching**: every request independently re-proves ownership and
//!   re-checks the tip.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tipfeed::{CommentService, ServiceConfig};
//! use tipfeed::store::SqliteStore;
//!
//! async fn example(
//!     addresses: Arc<impl tipfeed::auth::AddressOracle>,
//!     tips: Arc<impl tipfeed::auth::TipOracle>,
//! ) {
//!     let store = SqliteStore::open("comments.db").unwrap();
//!     let service = CommentService::new(
//!         addresses,
//!         tips,
//!         Arc::new(store),
//!         ServiceConfig::default(),
//!     );
//!
//!     // let outcome = service.post(&ctx, &doc, body, signed_body).await;
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `tipfeed::core` - Core primitives (DocumentId, Address, Comment, ...)
//! - `tipfeed::auth` - Gate, oracles, limiter, policy
//! - `tipfeed::store` - Storage abstraction and SQLite

pub mod error;
pub mod service;

// Re-export component crates
pub use tipfeed_auth as auth;
pub use tipfeed_core as core;
pub use tipfeed_store as store;

// Re-export main types for convenience
pub use error::{Result, ServiceError};
pub use service::{
    CommentService, DenyReason, ListOutcome, PostOutcome, ServiceConfig, VerifyOutcome,
};

// Re-export commonly used types
pub use tipfeed_auth::{ClientId, CommentPolicy, RequestContext, WriteLimiterConfig};
pub use tipfeed_core::{Address, Comment, DocumentId, DocumentTips, Network, Tip};
