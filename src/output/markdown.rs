//! Markdown report generation
//!
//! This module renders a crawl report, together with the field coverage of
//! the persisted collection, as a markdown document.

use crate::output::stats::{CrawlReport, OutputSummary};
use crate::output::OutputResult;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report to `output_path`
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `summary` - Field coverage of the persisted collection
/// * `output_path` - Path where the markdown file should be written
pub fn generate_markdown_report(
    report: &CrawlReport,
    summary: &OutputSummary,
    output_path: &Path,
) -> OutputResult<()> {
    let markdown = format_markdown_report(report, summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a crawl report as markdown
pub fn format_markdown_report(report: &CrawlReport, summary: &OutputSummary) -> String {
    let mut md = String::new();

    md.push_str("# Quire Crawl Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", report.started_at.to_rfc3339()));
    md.push_str(&format!("- **Finished**: {}\n", report.finished_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        report.duration_seconds()
    ));
    md.push_str(&format!("- **Output**: {}\n\n", report.output_location));

    md.push_str("## Discovery\n\n");
    md.push_str(&format!("- **Index Pages Probed**: {}\n", report.pages_probed));
    if let Some(page) = report.terminal_page {
        md.push_str(&format!("- **Listing Ended At Page**: {}\n", page));
    } else {
        md.push_str("- **Listing Ended At Page**: page bound reached\n");
    }
    md.push_str(&format!(
        "- **Article Links Found**: {}\n\n",
        report.links_discovered
    ));

    md.push_str("## Articles\n\n");
    md.push_str(&format!("- **Processed**: {}\n", report.articles_processed));
    md.push_str(&format!("- **Fetch Failures**: {}\n", report.fetch_failures));
    md.push_str(&format!(
        "- **Persist Failures**: {}\n",
        report.persist_failures
    ));
    md.push_str(&format!(
        "- **Success Rate**: {:.2}%\n\n",
        report.success_rate()
    ));

    md.push_str("## Field Coverage\n\n");
    md.push_str("| Field | Records |\n");
    md.push_str("|-------|---------|\n");
    for (field, count) in summary.coverage() {
        md.push_str(&format!("| {} | {} |\n", field, count));
    }
    md.push_str(&format!("| (URL only) | {} |\n", summary.bare));
    md.push_str(&format!("\n**Total records**: {}\n", summary.total));

    md
}
