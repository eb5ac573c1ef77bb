//! # Tipfeed Testkit
//!
//! Testing utilities for tipfeed.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: deterministic wallets that produce real signed
//!   messages, static and failing oracle implementations, and a
//!   ready-made store
//! - **Generators**: proptest strategies for property-based testing
//! - **Signature vectors**: deterministic seed/message/network triples
//!   whose signatures must verify identically everywhere
//!
//! ## Fixtures
//!
//! Quickly set up gating scenarios:
//!
//! ```rust
//! use tipfeed_testkit::fixtures::{StaticTipOracle, TestFixture};
//!
//! let fixture = TestFixture::with_seed([0x42; 32]);
//! let signature = fixture.wallet.sign_message("hello");
//! let tips = StaticTipOracle::new().with_tipper(fixture.document(1), fixture.wallet.address());
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use tipfeed_testkit::generators;
//!
//! proptest! {
//!     #[test]
//!     fn document_id_roundtrips(id in generators::document_id()) {
//!         prop_assert_eq!(id, id.to_hex().parse().unwrap());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    multi_party_wallets, FailingTipOracle, StaticAddressOracle, StaticTipOracle, TestFixture,
    Wallet,
};
pub use vectors::{all_vectors, resolve_vector, verify_all_vectors, SignatureVector};
