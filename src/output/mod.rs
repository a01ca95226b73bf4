//! Output module for crawl reports
//!
//! This module handles:
//! - The report returned by a finished crawl
//! - Field coverage summaries of a persisted article collection
//! - Console and markdown renderings of both

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report};
pub use stats::{print_report, print_summary, CrawlReport, OutputSummary};

use crate::storage::ArticleStore;
use crate::QuireError;
use thiserror::Error;

/// Errors that can occur while writing reports
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Summarizes the collection currently held by a store
///
/// # Returns
///
/// * `Ok(OutputSummary)` - Coverage counts for the persisted records
/// * `Err(QuireError)` - Failed to read the store
pub fn summarize_store(store: &dyn ArticleStore) -> Result<OutputSummary, QuireError> {
    let records = store.load()?;
    Ok(OutputSummary::from_records(&records))
}
