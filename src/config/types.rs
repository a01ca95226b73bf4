use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.smashingmagazine.com";
pub const DEFAULT_INDEX_PATH: &str = "/articles/";
pub const DEFAULT_PAGE_PATH: &str = "/articles/page/{page}/";
pub const DEFAULT_OUTPUT_PATH: &str = "smashingMagazineArticles.json";

/// Placeholder substituted with the page number in [`SiteConfig::page_path`]
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Main configuration structure for Quire
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// The site being harvested
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Origin prefixed to relative article links (e.g. "https://example.com")
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the first index page
    #[serde(rename = "index-path")]
    pub index_path: String,

    /// Path of index pages after the first; must contain `{page}`
    #[serde(rename = "page-path")]
    pub page_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            index_path: DEFAULT_INDEX_PATH.to_string(),
            page_path: DEFAULT_PAGE_PATH.to_string(),
        }
    }
}

impl SiteConfig {
    /// Returns the listing URL for a 1-based page number
    ///
    /// Page 1 is the bare index URL; later pages use the paginated path.
    pub fn index_page_url(&self, page: u32) -> String {
        let base = self.base_url.trim_end_matches('/');
        if page <= 1 {
            format!("{}{}", base, self.index_path)
        } else {
            let path = self.page_path.replace(PAGE_PLACEHOLDER, &page.to_string());
            format!("{}{}", base, path)
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of index pages probed at once
    #[serde(rename = "page-concurrency")]
    pub page_concurrency: u32,

    /// Maximum number of article pages fetched at once
    #[serde(rename = "article-concurrency")]
    pub article_concurrency: u32,

    /// Pause before every outbound request (milliseconds)
    #[serde(rename = "politeness-delay")]
    pub politeness_delay: u64,

    /// Highest index page number that will ever be probed
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Per-request timeout (milliseconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Overall crawl deadline (milliseconds); unset means no deadline
    #[serde(rename = "crawl-deadline")]
    pub crawl_deadline: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_concurrency: 5,
            article_concurrency: 5,
            politeness_delay: 500,
            max_pages: 500,
            request_timeout: 30_000,
            crawl_deadline: None,
        }
    }
}

impl CrawlerConfig {
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout)
    }

    pub fn crawl_deadline(&self) -> Option<Duration> {
        self.crawl_deadline.map(Duration::from_millis)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Persisted output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Sqlite,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the article collection
    pub path: String,

    /// Storage format of the article collection
    pub format: OutputFormat,

    /// Optional path for a markdown crawl report
    #[serde(rename = "report-path")]
    pub report_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_OUTPUT_PATH.to_string(),
            format: OutputFormat::Json,
            report_path: None,
        }
    }
}
