//! SQLite implementation of the CommentStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite behind a mutex-guarded connection. `append` is a single INSERT,
//! which gives it the per-document atomicity the trait requires.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use tipfeed_core::{Address, Comment, DocumentId};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::CommentStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Execute a blocking operation on the connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&conn)
    }

    /// Execute a blocking operation that needs mutable access.
    fn with_conn_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&mut conn)
    }
}

// Helper to convert a row to a Comment
fn row_to_comment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Comment> {
    let author: String = row.get("author")?;
    let body: String = row.get("body")?;
    Ok(Comment {
        body,
        author: Address::from(author),
    })
}

#[async_trait]
impl CommentStore for SqliteStore {
    async fn get(&self, document: &DocumentId) -> Result<Vec<Comment>> {
        let document = *document;
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT author, body FROM comments WHERE document_id = ?1 ORDER BY id",
            )?;
            let comments = stmt
                .query_map(params![document.as_bytes().as_slice()], row_to_comment)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(comments)
        })
    }

    async fn set(&self, document: &DocumentId, comments: Vec<Comment>) -> Result<()> {
        let document = *document;
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM comments WHERE document_id = ?1",
                params![document.as_bytes().as_slice()],
            )?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO comments (document_id, author, body) VALUES (?1, ?2, ?3)",
                )?;
                for comment in &comments {
                    stmt.execute(params![
                        document.as_bytes().as_slice(),
                        comment.author.as_str(),
                        comment.body,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    async fn append(&self, document: &DocumentId, comment: Comment) -> Result<()> {
        let document = *document;
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO comments (document_id, author, body) VALUES (?1, ?2, ?3)",
                params![
                    document.as_bytes().as_slice(),
                    comment.author.as_str(),
                    comment.body,
                ],
            )?;
            Ok(())
        })
    }

    async fn count(&self, document: &DocumentId) -> Result<u64> {
        let document = *document;
        self.with_conn(|conn| {
            let count: u64 = conn.query_row(
                "SELECT COUNT(*) FROM comments WHERE document_id = ?1",
                params![document.as_bytes().as_slice()],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    async fn batch_count(&self, documents: &[DocumentId]) -> Result<HashMap<DocumentId, u64>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT COUNT(*) FROM comments WHERE document_id = ?1")?;
            let mut counts = HashMap::with_capacity(documents.len());
            for document in documents {
                let count: u64 =
                    stmt.query_row(params![document.as_bytes().as_slice()], |row| row.get(0))?;
                counts.insert(*document, count);
            }
            Ok(counts)
        })
    }
}
