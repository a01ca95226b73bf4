//! Crawl report and output statistics
//!
//! This module provides the report produced by a crawl run and the field
//! coverage summary computed from a persisted article collection.

use crate::storage::ArticleRecord;
use chrono::{DateTime, Utc};

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Index pages probed, including speculative probes past the end
    pub pages_probed: u32,

    /// First page that ended the listing, if one did
    pub terminal_page: Option<u32>,

    /// Distinct article URLs discovered
    pub links_discovered: u64,

    /// Article tasks that ran to completion
    pub articles_processed: u64,

    /// Articles whose page could not be fetched
    pub fetch_failures: u64,

    /// Records that could not be written to the store
    pub persist_failures: u64,

    /// Where the records were written
    pub output_location: String,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Percentage of processed articles that were fetched successfully
    pub fn success_rate(&self) -> f64 {
        if self.articles_processed == 0 {
            return 0.0;
        }
        let ok = self.articles_processed.saturating_sub(self.fetch_failures);
        (ok as f64 / self.articles_processed as f64) * 100.0
    }
}

/// Field coverage of a persisted article collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSummary {
    pub total: u64,
    pub with_title: u64,
    pub with_author: u64,
    pub with_date: u64,
    pub with_categories: u64,
    pub with_summary: u64,
    pub with_content: u64,

    /// Records carrying nothing but their URL (failed fetches)
    pub bare: u64,
}

impl OutputSummary {
    pub fn from_records(records: &[ArticleRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.total += 1;
            summary.with_title += record.title.is_some() as u64;
            summary.with_author += record.author.is_some() as u64;
            summary.with_date += record.date.is_some() as u64;
            summary.with_categories += !record.categories.is_empty() as u64;
            summary.with_summary += record.summary.is_some() as u64;
            summary.with_content += record.content.is_some() as u64;
            summary.bare += record.is_bare() as u64;
        }
        summary
    }

    /// (label, count) pairs for every field, in record order
    pub fn coverage(&self) -> [(&'static str, u64); 6] {
        [
            ("title", self.with_title),
            ("author", self.with_author),
            ("date", self.with_date),
            ("categories", self.with_categories),
            ("summary", self.with_summary),
            ("content", self.with_content),
        ]
    }
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Run:");
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!("  Duration: {}s", report.duration_seconds());
    println!();

    println!("Discovery:");
    println!("  Index pages probed: {}", report.pages_probed);
    match report.terminal_page {
        Some(page) => println!("  Listing ended at page: {}", page),
        None => println!("  Listing ended at page: (page bound reached)"),
    }
    println!("  Article links found: {}", report.links_discovered);
    println!();

    println!("Articles:");
    println!("  Processed: {}", report.articles_processed);
    println!("  Fetch failures: {}", report.fetch_failures);
    println!("  Persist failures: {}", report.persist_failures);
    println!("  Success rate: {:.1}%", report.success_rate());
    println!();

    println!("Data saved to {}", report.output_location);
}

/// Prints an output summary to stdout
pub fn print_summary(summary: &OutputSummary) {
    println!("=== Output Summary ===\n");
    println!("Records: {}", summary.total);
    println!("Bare records (URL only): {}", summary.bare);
    println!();

    println!("Field coverage:");
    for (field, count) in summary.coverage() {
        println!(
            "  {}: {} ({:.1}%)",
            field,
            count,
            percentage(count, summary.total)
        );
    }
}
