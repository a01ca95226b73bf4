//! Index page parser
//!
//! Extracts article links from a paginated listing page. Listing entries are
//! matched structurally (article container, then title heading, then anchor)
//! and each reference is resolved against the site's base origin.

use scraper::{Html, Selector};
use url::Url;

/// Listing entry anchors: article container → title heading → anchor
pub const ARTICLE_LINK_SELECTOR: &str = "article.article--post h2.article--post__title a";

/// Extracts article URLs from an index page
///
/// Returns an empty vector when nothing matches; for the pagination walker
/// that is the normal end-of-listing signal, not an error. Duplicates within
/// a page are kept; deduplication happens across the whole walk.
///
/// # Arguments
///
/// * `html` - The index page content
/// * `base_url` - Origin used to resolve relative references
///
/// # Example
///
/// ```
/// use quire::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<article class="article--post"><h2 class="article--post__title"><a href="/articles/hello/">Hello</a></h2></article>"#;
/// let base = Url::parse("https://example.com").unwrap();
/// assert_eq!(extract_links(html, &base), vec!["https://example.com/articles/hello/".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse(ARTICLE_LINK_SELECTOR) {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: and data: references
/// - anything that is not HTTP(S) after resolution
///
/// The fragment is dropped so `/a/#comments` and `/a/` name the same article.
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);

    Some(absolute_url.to_string())
}
