//! Store trait: the abstract interface for comment persistence.
//!
//! This trait allows the service to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::collections::HashMap;

use async_trait::async_trait;
use tipfeed_core::{Comment, DocumentId};

use crate::error::Result;

/// The CommentStore trait: async interface for per-document comment feeds.
///
/// # Design Notes
///
/// - **Unknown ids read empty**: `get` returns an empty vec and `count`
///   returns zero for a document with no comments; neither is an error.
/// - **Atomic append**: `append` must be atomic per document. The service
///   never performs a read-modify-write around a post, so a backend that
///   implemented `append` as get-then-set would reintroduce the lost-update
///   race between concurrent posts.
/// - **Append order is feed order**: `get` returns comments in the order
///   they were appended.
#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Get the ordered comment feed for a document.
    async fn get(&self, document: &DocumentId) -> Result<Vec<Comment>>;

    /// Replace a document's entire feed.
    ///
    /// Used for bulk loading and administrative repair, never by the post
    /// pipeline.
    async fn set(&self, document: &DocumentId, comments: Vec<Comment>) -> Result<()>;

    /// Append one comment to a document's feed, atomically.
    async fn append(&self, document: &DocumentId, comment: Comment) -> Result<()>;

    /// Number of comments on a document.
    async fn count(&self, document: &DocumentId) -> Result<u64>;

    /// Comment counts for a batch of documents.
    ///
    /// Every requested id appears in the result, zero-valued when unknown.
    async fn batch_count(&self, documents: &[DocumentId]) -> Result<HashMap<DocumentId, u64>>;
}
