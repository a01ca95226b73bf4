//! Storage traits and error types
//!
//! This module defines the trait interface for article stores and
//! associated error types.

use crate::storage::ArticleRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for article store implementations
///
/// Implementations hold their own lock: concurrent calls are serialized with
/// respect to each other, and a successful `append` has reached durable
/// storage before it returns. The persisted collection is valid at every
/// point a reader can observe it.
pub trait ArticleStore: Send + Sync {
    /// Empties the persisted collection
    fn reset(&self) -> StorageResult<()>;

    /// Adds one record and persists the whole collection
    fn append(&self, record: &ArticleRecord) -> StorageResult<()>;

    /// Reads the persisted collection
    ///
    /// Unreadable persisted state is reported as an empty collection.
    fn load(&self) -> StorageResult<Vec<ArticleRecord>>;

    /// Human-readable location of the persisted collection
    fn location(&self) -> String;
}
