//! Pagination walker
//!
//! Probes index pages 1, 2, 3, … through a bounded pool without knowing the
//! page count up front. A page that is missing (404), unreachable, or lists
//! no articles ends the walk: no new page numbers are issued after it, but
//! probes already in flight finish and their links are still collected.

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::parser::extract_links;
use crate::crawler::scheduler::WorkerPool;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::Instant;
use url::Url;

/// Why a page ended the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The index page answered 404
    NotFound,
    /// The index page listed no articles
    NoLinks,
    /// The index page could not be fetched
    TransportError(String),
}

/// Outcome of probing one index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The page listed at least one article
    Links(Vec<String>),
    /// The page signals the end of the listing
    Terminal(StopReason),
}

/// One probed page and what it yielded
#[derive(Debug, Clone)]
pub struct PageProbe {
    pub page: u32,
    pub outcome: PageOutcome,
}

/// The deduplicated result of a pagination walk
#[derive(Debug, Clone, Default)]
pub struct DiscoveredLinks {
    /// Every article URL seen on any probed page, once
    pub links: HashSet<String>,

    /// Number of index pages probed, including speculative ones
    pub pages_probed: u32,

    /// Lowest page number that signalled the end of the listing
    pub terminal_page: Option<u32>,
}

/// Walks the paginated index with a bounded number of concurrent probes
pub struct PaginationWalker {
    config: Arc<Config>,
    fetcher: Arc<Fetcher>,
    base_url: Url,
    deadline: Option<Instant>,
}

impl PaginationWalker {
    /// Creates a walker for the configured site
    ///
    /// # Returns
    ///
    /// * `Ok(PaginationWalker)` - Walker ready to run
    /// * `Err(url::ParseError)` - The configured base URL is not a URL
    pub fn new(config: Arc<Config>, fetcher: Arc<Fetcher>) -> Result<Self, url::ParseError> {
        let base_url = Url::parse(&config.site.base_url)?;
        Ok(Self {
            config,
            fetcher,
            base_url,
            deadline: None,
        })
    }

    /// Bounds every probe by an overall crawl deadline
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Runs the walk to completion
    ///
    /// Returns once every issued probe has settled. If page 1 already ends
    /// the listing the result is simply empty.
    pub async fn walk(&self) -> DiscoveredLinks {
        let crawler = &self.config.crawler;
        let mut pool = WorkerPool::new(crawler.page_concurrency as usize);
        let mut discovered = DiscoveredLinks::default();
        let mut next_page: u32 = 1;
        let mut stop = false;

        loop {
            while !stop && next_page <= crawler.max_pages && pool.has_capacity() {
                let url = self.config.site.index_page_url(next_page);
                let fetcher = Arc::clone(&self.fetcher);
                let base_url = self.base_url.clone();
                let deadline = self.deadline;
                let page = next_page;

                pool.spawn(async move {
                    probe_page(&fetcher, page, &url, &base_url, deadline).await
                });
                next_page += 1;
            }

            let Some(result) = pool.join_next().await else {
                break;
            };

            let probe = match result {
                Ok(probe) => probe,
                Err(e) => {
                    tracing::error!("Index probe task failed: {}", e);
                    stop = true;
                    continue;
                }
            };

            discovered.pages_probed += 1;

            match probe.outcome {
                PageOutcome::Links(links) => {
                    tracing::debug!("Page {}: {} article links", probe.page, links.len());
                    discovered.links.extend(links);
                }
                PageOutcome::Terminal(reason) => {
                    if !stop {
                        tracing::info!(
                            "Page {} ends the listing ({:?}); waiting for {} in-flight probes",
                            probe.page,
                            reason,
                            pool.in_flight()
                        );
                    }
                    stop = true;
                    discovered.terminal_page = Some(
                        discovered
                            .terminal_page
                            .map_or(probe.page, |p| p.min(probe.page)),
                    );
                }
            }
        }

        if discovered.terminal_page.is_none() && next_page > crawler.max_pages {
            tracing::warn!(
                "Stopped at page bound {} without reaching the end of the listing",
                crawler.max_pages
            );
        }

        discovered
    }
}

/// Fetches one index page and classifies it
async fn probe_page(
    fetcher: &Fetcher,
    page: u32,
    url: &str,
    base_url: &Url,
    deadline: Option<Instant>,
) -> PageProbe {
    tracing::info!("Fetching links from page {}: {}", page, url);

    let outcome = match fetcher.fetch_before(url, deadline).await {
        FetchResult::Success { body, .. } => {
            let links = extract_links(&body, base_url);
            if links.is_empty() {
                PageOutcome::Terminal(StopReason::NoLinks)
            } else {
                PageOutcome::Links(links)
            }
        }
        FetchResult::NotFound => PageOutcome::Terminal(StopReason::NotFound),
        FetchResult::TransportError { error } => {
            tracing::warn!("Error fetching index page {}: {}", url, error);
            PageOutcome::Terminal(StopReason::TransportError(error))
        }
    };

    PageProbe { page, outcome }
}
