//! Storage module for persisting harvested articles
//!
//! This module owns the crawl output. Every backend implements
//! [`ArticleStore`], which serializes writers and persists each record
//! before `append` returns:
//! - [`JsonFileStore`]: a pretty-printed JSON array rewritten on every append
//! - [`SqliteStore`]: one row per article in an embedded SQLite database

mod json;
mod schema;
mod sqlite;
mod traits;

pub use json::JsonFileStore;
pub use sqlite::SqliteStore;
pub use traits::{ArticleStore, StorageError, StorageResult};

use crate::config::{OutputConfig, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Opens the store selected by the output configuration
///
/// # Arguments
///
/// * `config` - The output configuration (path and format)
///
/// # Returns
///
/// * `Ok(Arc<dyn ArticleStore>)` - A store ready to be shared between workers
/// * `Err(StorageError)` - Failed to open the backing file
pub fn open_store(config: &OutputConfig) -> StorageResult<Arc<dyn ArticleStore>> {
    let path = Path::new(&config.path);
    let store: Arc<dyn ArticleStore> = match config.format {
        OutputFormat::Json => Arc::new(JsonFileStore::new(path)),
        OutputFormat::Sqlite => Arc::new(SqliteStore::new(path)?),
    };
    Ok(store)
}

/// Reads the configured output without creating or modifying anything
///
/// A missing or unreadable output reads as an empty collection.
pub fn load_existing(config: &OutputConfig) -> StorageResult<Vec<ArticleRecord>> {
    let path = Path::new(&config.path);
    match config.format {
        OutputFormat::Json => JsonFileStore::new(path).load(),
        OutputFormat::Sqlite => SqliteStore::load_read_only(path),
    }
}

/// Structured metadata extracted from one article page
///
/// `url` is the identity of the record. Every other field is extracted
/// independently and is `None` (or empty) when it could not be found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
}

impl ArticleRecord {
    /// Creates a record with only the URL set
    ///
    /// This is also the record emitted for an article whose fetch failed.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Returns true if no field besides the URL carries data
    pub fn is_bare(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.date.is_none()
            && self.categories.is_empty()
            && self.summary.is_none()
            && self.content.is_none()
    }
}
