//! Crawler coordinator - main crawl orchestration logic
//!
//! A crawl runs in two phases separated by a barrier:
//! 1. The pagination walker discovers the deduplicated set of article URLs
//! 2. One task per URL fetches the article, extracts its record and appends
//!    it to the store, through a bounded worker pool
//!
//! No task failure aborts the crawl. Failed fetches still produce a record
//! carrying only the URL, and failed appends are counted and logged.

use crate::config::Config;
use crate::crawler::article::extract_article;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::pagination::{DiscoveredLinks, PaginationWalker};
use crate::crawler::scheduler::WorkerPool;
use crate::output::CrawlReport;
use crate::storage::{open_store, ArticleRecord, ArticleStore};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinError;
use tokio::time::Instant;

/// What happened to one article task
#[derive(Debug, Clone)]
pub struct ArticleOutcome {
    /// The article page was fetched successfully
    pub fetched: bool,
    /// The record reached the store
    pub persisted: bool,
}

/// Counters for the article phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArticlePhaseStats {
    pub processed: u64,
    pub fetch_failures: u64,
    pub persist_failures: u64,
}

impl ArticlePhaseStats {
    fn record(&mut self, result: Result<ArticleOutcome, JoinError>) {
        self.processed += 1;
        match result {
            Ok(outcome) => {
                if !outcome.fetched {
                    self.fetch_failures += 1;
                }
                if !outcome.persisted {
                    self.persist_failures += 1;
                }
            }
            Err(e) => {
                tracing::error!("Article task failed: {}", e);
                self.fetch_failures += 1;
                self.persist_failures += 1;
            }
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<Fetcher>,
    store: Arc<dyn ArticleStore>,
}

impl Coordinator {
    /// Creates a coordinator writing to the configured output
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(QuireError)` - Failed to open the store or build the client
    pub fn new(config: Config) -> crate::Result<Self> {
        let store = open_store(&config.output)?;
        Self::with_store(config, store)
    }

    /// Creates a coordinator writing to an explicit store
    pub fn with_store(config: Config, store: Arc<dyn ArticleStore>) -> crate::Result<Self> {
        let fetcher = Fetcher::from_config(&config.crawler, &config.user_agent)?;

        Ok(Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ArticleStore> {
        &self.store
    }

    /// Runs a complete crawl
    ///
    /// This method:
    /// 1. Resets the store to an empty collection
    /// 2. Walks the index to discover article links
    /// 3. Fetches, extracts and persists every discovered article
    /// 4. Returns a report of the run
    pub async fn run(&self) -> crate::Result<CrawlReport> {
        let started_at = Utc::now();
        let deadline = self
            .config
            .crawler
            .crawl_deadline()
            .map(|limit| Instant::now() + limit);

        self.store.reset()?;
        tracing::info!("Output reset: {}", self.store.location());

        tracing::info!(
            "Starting to scrape article links from {}",
            self.config.site.index_page_url(1)
        );
        let discovered = self.discover_links(deadline).await?;
        tracing::info!(
            "Found {} article links across {} index pages",
            discovered.links.len(),
            discovered.pages_probed
        );

        tracing::info!("Starting to scrape article data");
        let stats = self.crawl_articles(&discovered.links, deadline).await;
        tracing::info!(
            "Article data scraping complete: {} processed, {} fetch failures, {} persist failures",
            stats.processed,
            stats.fetch_failures,
            stats.persist_failures
        );

        Ok(CrawlReport {
            started_at,
            finished_at: Utc::now(),
            pages_probed: discovered.pages_probed,
            terminal_page: discovered.terminal_page,
            links_discovered: discovered.links.len() as u64,
            articles_processed: stats.processed,
            fetch_failures: stats.fetch_failures,
            persist_failures: stats.persist_failures,
            output_location: self.store.location(),
        })
    }

    /// Phase 1: walks the paginated index
    pub async fn discover_links(
        &self,
        deadline: Option<Instant>,
    ) -> crate::Result<DiscoveredLinks> {
        let walker = PaginationWalker::new(Arc::clone(&self.config), Arc::clone(&self.fetcher))?
            .with_deadline(deadline);
        Ok(walker.walk().await)
    }

    /// Phase 2: one fetch → extract → append task per discovered URL
    ///
    /// Tasks run through a pool sized by `article_concurrency`; records are
    /// persisted in completion order.
    pub async fn crawl_articles(
        &self,
        links: &HashSet<String>,
        deadline: Option<Instant>,
    ) -> ArticlePhaseStats {
        let total = links.len();
        let mut pool = WorkerPool::new(self.config.crawler.article_concurrency as usize);
        let mut stats = ArticlePhaseStats::default();

        let mut urls: Vec<&String> = links.iter().collect();
        urls.sort();

        for url in urls {
            pool.wait_for_slot(|result| {
                stats.record(result);
                report_progress(&stats, total);
            })
            .await;

            let fetcher = Arc::clone(&self.fetcher);
            let store = Arc::clone(&self.store);
            let url = url.clone();
            pool.spawn(async move { process_article(&fetcher, store, url, deadline).await });
        }

        while let Some(result) = pool.join_next().await {
            stats.record(result);
            report_progress(&stats, total);
        }

        stats
    }
}

fn report_progress(stats: &ArticlePhaseStats, total: usize) {
    tracing::info!(
        "Progress: {}/{} articles ({} failed)",
        stats.processed,
        total,
        stats.fetch_failures
    );
}

/// Fetches, extracts and persists one article
///
/// A failed fetch still yields a record (URL only) so the failure is
/// visible in the output.
async fn process_article(
    fetcher: &Fetcher,
    store: Arc<dyn ArticleStore>,
    url: String,
    deadline: Option<Instant>,
) -> ArticleOutcome {
    let (record, fetched) = match fetcher.fetch_before(&url, deadline).await {
        FetchResult::Success { body, .. } => (extract_article(&url, &body), true),
        FetchResult::NotFound => {
            tracing::warn!("Error fetching article {}: HTTP 404", url);
            (ArticleRecord::empty(url.as_str()), false)
        }
        FetchResult::TransportError { error } => {
            tracing::warn!("Error fetching article {}: {}", url, error);
            (ArticleRecord::empty(url.as_str()), false)
        }
    };

    let persisted = match tokio::task::spawn_blocking(move || store.append(&record)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::error!("Failed to persist {}: {}", url, e);
            false
        }
        Err(e) => {
            tracing::error!("Persist task for {} failed: {}", url, e);
            false
        }
    };

    ArticleOutcome { fetched, persisted }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use quire::config::Config;
/// use quire::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let report = run_crawl(Config::default()).await?;
/// println!("{} articles", report.articles_processed);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> crate::Result<CrawlReport> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_stats_counts_failures() {
        let mut stats = ArticlePhaseStats::default();
        stats.record(Ok(ArticleOutcome {
            fetched: true,
            persisted: true,
        }));
        stats.record(Ok(ArticleOutcome {
            fetched: false,
            persisted: true,
        }));
        stats.record(Ok(ArticleOutcome {
            fetched: true,
            persisted: false,
        }));

        assert_eq!(
            stats,
            ArticlePhaseStats {
                processed: 3,
                fetch_failures: 1,
                persist_failures: 1,
            }
        );
    }
}
