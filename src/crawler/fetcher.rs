//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building HTTP clients with the configured user agent and timeout
//! - Paying the politeness delay before every request
//! - Classifying responses into success, not-found and transport errors
//! - Bounding a fetch by the overall crawl deadline

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::Instant;

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The origin answered 404
    NotFound,

    /// Network failure, timeout, or any other non-success status
    TransportError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use quire::config::UserAgentConfig;
/// use quire::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues one GET per call, after a fixed politeness delay
///
/// The fetcher never retries: a failed request is reported once and the
/// caller decides what to do with it.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    politeness_delay: Duration,
}

impl Fetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client, politeness_delay: Duration) -> Self {
        Self {
            client,
            politeness_delay,
        }
    }

    /// Builds a fetcher from crawler and user agent configuration
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let client = build_http_client(user_agent, crawler.request_timeout())?;
        Ok(Self::new(client, crawler.politeness_delay()))
    }

    /// Fetches a URL
    ///
    /// The politeness delay is paid before the request on every call,
    /// whatever the outcome.
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 2xx | Success |
    /// | HTTP 404 | NotFound |
    /// | Any other status | TransportError |
    /// | Timeout / connect / body error | TransportError |
    pub async fn fetch(&self, url: &str) -> FetchResult {
        tokio::time::sleep(self.politeness_delay).await;

        tracing::debug!("GET {}", url);

        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                let final_url = response.url().to_string();

                if status == StatusCode::NOT_FOUND {
                    return FetchResult::NotFound;
                }

                if !status.is_success() {
                    return FetchResult::TransportError {
                        error: format!("HTTP {}", status.as_u16()),
                    };
                }

                match response.text().await {
                    Ok(body) => FetchResult::Success {
                        final_url,
                        status_code: status.as_u16(),
                        body,
                    },
                    Err(e) => FetchResult::TransportError {
                        error: classify_error(&e),
                    },
                }
            }
            Err(e) => FetchResult::TransportError {
                error: classify_error(&e),
            },
        }
    }

    /// Fetches a URL, giving up when `deadline` passes
    ///
    /// An expired deadline is reported as a transport error so callers treat
    /// it like any other failed request.
    pub async fn fetch_before(&self, url: &str, deadline: Option<Instant>) -> FetchResult {
        let Some(deadline) = deadline else {
            return self.fetch(url).await;
        };

        match tokio::time::timeout_at(deadline, self.fetch(url)).await {
            Ok(result) => result,
            Err(_) => FetchResult::TransportError {
                error: "crawl deadline exceeded".to_string(),
            },
        }
    }
}

fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher(delay_ms: u64, timeout_ms: u64) -> Fetcher {
        let client =
            build_http_client(&UserAgentConfig::default(), Duration::from_millis(timeout_ms))
                .unwrap();
        Fetcher::new(client, Duration::from_millis(delay_ms))
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>hi</html>"))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(0, 2_000);
        let result = fetcher.fetch(&format!("{}/ok", server.uri())).await;

        match result {
            FetchResult::Success {
                status_code, body, ..
            } => {
                assert_eq!(status_code, 200);
                assert_eq!(body, "<html>hi</html>");
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;

        let fetcher = test_fetcher(0, 2_000);
        let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;

        assert_eq!(result, FetchResult::NotFound);
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(0, 2_000);
        let result = fetcher.fetch(&format!("{}/busy", server.uri())).await;

        assert_eq!(
            result,
            FetchResult::TransportError {
                error: "HTTP 503".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(0, 200);
        let result = fetcher.fetch(&format!("{}/slow", server.uri())).await;

        assert!(matches!(result, FetchResult::TransportError { .. }));
    }

    #[tokio::test]
    async fn test_politeness_delay_is_paid_on_failure() {
        let server = MockServer::start().await;

        let fetcher = test_fetcher(150, 2_000);
        let start = std::time::Instant::now();
        let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;

        assert_eq!(result, FetchResult::NotFound);
        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_expired_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let fetcher = test_fetcher(0, 10_000);
        let deadline = Instant::now() + Duration::from_millis(100);
        let result = fetcher
            .fetch_before(&format!("{}/slow", server.uri()), Some(deadline))
            .await;

        assert_eq!(
            result,
            FetchResult::TransportError {
                error: "crawl deadline exceeded".to_string()
            }
        );
    }
}
