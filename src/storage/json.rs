//! JSON file storage implementation
//!
//! The whole collection lives in one pretty-printed JSON array. Each append
//! re-reads the file, adds the record and rewrites the file through a
//! temporary sibling that is renamed over the original, so the file on disk
//! is always a complete document.

use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use crate::storage::ArticleRecord;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// JSON file storage backend
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`
    ///
    /// Nothing is touched on disk until the first `reset` or `append`.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Returns the path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> StorageResult<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Reads the current collection; missing or malformed files are empty
    ///
    /// Bytes that are not UTF-8 count as malformed. Only genuine I/O failures
    /// such as a permission error are returned.
    fn read_records(&self) -> StorageResult<Vec<ArticleRecord>> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&content) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed output file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Replaces the file with `records` via write-to-temp and rename
    fn write_records(&self, records: &[ArticleRecord]) -> StorageResult<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut ser)?;
        buf.push(b'\n');

        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty());
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.temp_path();
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(&buf)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;
        sync_dir(parent.unwrap_or_else(|| Path::new(".")))?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// Flushes a directory entry so a completed rename survives power loss
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}

impl ArticleStore for JsonFileStore {
    fn reset(&self) -> StorageResult<()> {
        let _guard = self.guard()?;
        self.write_records(&[])
    }

    fn append(&self, record: &ArticleRecord) -> StorageResult<()> {
        let _guard = self.guard()?;
        let mut records = self.read_records()?;
        records.push(record.clone());
        self.write_records(&records)?;
        tracing::debug!(
            "Persisted {} ({} records in {})",
            record.url,
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> StorageResult<Vec<ArticleRecord>> {
        let _guard = self.guard()?;
        self.read_records()
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
