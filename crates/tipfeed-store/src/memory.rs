//! In-memory implementation of the CommentStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tipfeed_core::{Comment, DocumentId};

use crate::error::Result;
use crate::traits::CommentStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock;
/// `append` holds the write lock for the whole push, which makes it atomic
/// per document.
pub struct MemoryStore {
    feeds: RwLock<HashMap<DocumentId, Vec<Comment>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            feeds: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn get(&self, document: &DocumentId) -> Result<Vec<Comment>> {
        let feeds = self.feeds.read().unwrap();
        Ok(feeds.get(document).cloned().unwrap_or_default())
    }

    async fn set(&self, document: &DocumentId, comments: Vec<Comment>) -> Result<()> {
        let mut feeds = self.feeds.write().unwrap();
        feeds.insert(*document, comments);
        Ok(())
    }

    async fn append(&self, document: &DocumentId, comment: Comment) -> Result<()> {
        let mut feeds = self.feeds.write().unwrap();
        feeds.entry(*document).or_default().push(comment);
        Ok(())
    }

    async fn count(&self, document: &DocumentId) -> Result<u64> {
        let feeds = self.feeds.read().unwrap();
        Ok(feeds.get(document).map(|c| c.len() as u64).unwrap_or(0))
    }

    async fn batch_count(&self, documents: &[DocumentId]) -> Result<HashMap<DocumentId, u64>> {
        let feeds = self.feeds.read().unwrap();
        Ok(documents
            .iter()
            .map(|d| (*d, feeds.get(d).map(|c| c.len() as u64).unwrap_or(0)))
            .collect())
    }
}
