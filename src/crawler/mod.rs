//! Crawler module for article discovery and extraction
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a politeness delay
//! - Index parsing and article link extraction
//! - Concurrent pagination with dynamic termination
//! - Per-field article extraction
//! - Overall crawl coordination over bounded worker pools

mod article;
mod coordinator;
mod fetcher;
mod pagination;
mod parser;
mod scheduler;

pub use article::extract_article;
pub use coordinator::{run_crawl, ArticleOutcome, ArticlePhaseStats, Coordinator};
pub use fetcher::{build_http_client, FetchResult, Fetcher};
pub use pagination::{DiscoveredLinks, PageOutcome, PageProbe, PaginationWalker, StopReason};
pub use parser::{extract_links, resolve_link};
pub use scheduler::WorkerPool;
