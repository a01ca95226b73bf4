//! Configuration module for Quire
//!
//! Every setting has a compiled-in default, so a crawl can run without any
//! file at all. A TOML file may override any subset of the settings.
//!
//! # Example
//!
//! ```no_run
//! use quire::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("quire.toml")).unwrap();
//! println!("Article workers: {}", config.crawler.article_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, OutputFormat, SiteConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
