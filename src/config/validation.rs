use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig, PAGE_PLACEHOLDER,
};
use crate::{ConfigError, ConfigResult};
use url::Url;

const MAX_CONCURRENCY: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the harvested site
fn validate_site_config(config: &SiteConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", config.base_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if !config.index_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "index_path must start with '/', got '{}'",
            config.index_path
        )));
    }

    if !config.page_path.starts_with('/') || !config.page_path.contains(PAGE_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "page_path must start with '/' and contain '{}', got '{}'",
            PAGE_PLACEHOLDER, config.page_path
        )));
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.page_concurrency < 1 || config.page_concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "page_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.page_concurrency
        )));
    }

    if config.article_concurrency < 1 || config.article_concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "article_concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.article_concurrency
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request_timeout must be >= 1ms".to_string(),
        ));
    }

    if config.crawl_deadline == Some(0) {
        return Err(ConfigError::Validation(
            "crawl_deadline must be >= 1ms when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Crawler name: non-empty, alphanumeric + hyphens/underscores only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.report_path, Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "report_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
