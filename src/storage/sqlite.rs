//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ArticleStore
//! trait. Every append is its own committed statement, so a record is durable
//! as soon as `append` returns.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use crate::storage::ArticleRecord;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// SQLite storage backend
pub struct SqliteStore {
    path: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the database at `path`
    ///
    /// A file that exists but is not a usable database is replaced by a new,
    /// empty one.
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = match open_connection(path) {
            Ok(conn) => conn,
            Err(e) if path.exists() => {
                tracing::warn!(
                    "Replacing unreadable database {}: {}",
                    path.display(),
                    e
                );
                std::fs::remove_file(path)?;
                open_connection(path)?
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Reads the records of an existing database without modifying it
    ///
    /// A missing file or one that is not a usable database reads as an empty
    /// collection and is left untouched on disk.
    pub fn load_read_only(path: &Path) -> StorageResult<Vec<ArticleRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let conn = match Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Ignoring unreadable database {}: {}", path.display(), e);
                return Ok(Vec::new());
            }
        };

        let mut stmt = match conn.prepare(SELECT_RECORDS) {
            Ok(stmt) => stmt,
            Err(e) => {
                tracing::warn!("Ignoring unreadable database {}: {}", path.display(), e);
                return Ok(Vec::new());
            }
        };

        read_records(&mut stmt)
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

const SELECT_RECORDS: &str = "SELECT url, title, author, date, categories, summary, content
     FROM articles ORDER BY id";

fn read_records(stmt: &mut rusqlite::Statement<'_>) -> StorageResult<Vec<ArticleRecord>> {
    let rows = stmt.query_map([], |row| {
        let categories: String = row.get(4)?;
        Ok(ArticleRecord {
            url: row.get(0)?,
            title: row.get(1)?,
            author: row.get(2)?,
            date: row.get(3)?,
            categories: serde_json::from_str(&categories).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
            })?,
            summary: row.get(5)?,
            content: row.get(6)?,
        })
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row?);
    }

    Ok(records)
}

fn open_connection(path: &Path) -> Result<Connection, rusqlite::Error> {
    let conn = Connection::open(path)?;

    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = FULL;
    ",
    )?;

    initialize_schema(&conn)?;

    Ok(conn)
}

impl ArticleStore for SqliteStore {
    fn reset(&self) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM articles", [])?;
        Ok(())
    }

    fn append(&self, record: &ArticleRecord) -> StorageResult<()> {
        let categories = serde_json::to_string(&record.categories)?;
        let now = Utc::now().to_rfc3339();

        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO articles
             (url, title, author, date, categories, summary, content, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.url,
                record.title,
                record.author,
                record.date,
                categories,
                record.summary,
                record.content,
                now
            ],
        )?;

        tracing::debug!("Persisted {} to {}", record.url, self.path.display());
        Ok(())
    }

    fn load(&self) -> StorageResult<Vec<ArticleRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(SELECT_RECORDS)?;
        read_records(&mut stmt)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
