//! Quire main entry point
//!
//! This is the command-line interface for the Quire article harvester.

use anyhow::Context;
use clap::Parser;
use quire::config::{load_config_with_hash, Config};
use quire::crawler::Coordinator;
use quire::output::{
    generate_markdown_report, print_report, print_summary, summarize_store, OutputSummary,
};
use quire::storage::load_existing;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Quire: a polite article harvester
///
/// Quire walks a paginated article index, extracts title, author, date,
/// categories, summary and body from every article it finds, and persists
/// each record as soon as it is extracted.
#[derive(Parser, Debug)]
#[command(name = "quire")]
#[command(version)]
#[command(about = "A polite article harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Summarize the existing output and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            Config::default()
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quire=info,warn"),
            1 => EnvFilter::new("quire=debug,info"),
            2 => EnvFilter::new("quire=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Quire Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  First index page: {}", config.site.index_page_url(1));
    println!("  Second index page: {}", config.site.index_page_url(2));

    println!("\nCrawler Configuration:");
    println!("  Page concurrency: {}", config.crawler.page_concurrency);
    println!(
        "  Article concurrency: {}",
        config.crawler.article_concurrency
    );
    println!(
        "  Politeness delay: {}ms",
        config.crawler.politeness_delay
    );
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Request timeout: {}ms", config.crawler.request_timeout);
    match config.crawler.crawl_deadline {
        Some(ms) => println!("  Crawl deadline: {}ms", ms),
        None => println!("  Crawl deadline: none"),
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!("  Format: {}", config.output.format);
    if let Some(report_path) = &config.output.report_path {
        println!("  Report: {}", report_path);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: summarizes the existing output
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Output: {}\n", config.output.path);

    let records = load_existing(&config.output)?;
    print_summary(&OutputSummary::from_records(&records));

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    let report_path = config.output.report_path.clone();

    let coordinator = Coordinator::new(config)?;
    let report = match coordinator.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let summary = summarize_store(coordinator.store().as_ref())?;

    print_report(&report);
    println!();
    print_summary(&summary);

    if let Some(path) = report_path {
        generate_markdown_report(&report, &summary, Path::new(&path))?;
        tracing::info!("Report written to {}", path);
    }

    Ok(())
}
