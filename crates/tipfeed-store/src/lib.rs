//! # Tipfeed Store
//!
//! Comment persistence for tipfeed. Provides a trait-based interface for
//! per-document comment feeds with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts comment storage behind the [`CommentStore`]
//! trait. The primary implementation is [`SqliteStore`], with
//! [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`CommentStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//!
//! ## Design Notes
//!
//! - **Unknown documents read empty**: `get` and `count` on an id with no
//!   comments return an empty sequence / zero, never an error.
//! - **Atomic appends**: `append` is atomic per document. Two concurrent
//!   posts to the same document may interleave in any order, but neither
//!   is lost. Backends must not implement it as read-modify-write.
//! - **Append order is feed order**: `get` returns comments in the order
//!   they were appended.

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::CommentStore;
