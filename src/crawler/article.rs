//! Article page extraction
//!
//! Builds an [`ArticleRecord`] from a fetched article page. Each field is
//! looked up on its own; a field whose selector matches nothing stays `None`
//! and never affects the others. A matched element with blank text yields an
//! empty string, not `None`.

use crate::storage::ArticleRecord;
use scraper::{ElementRef, Html, Selector};

pub const TITLE_SELECTOR: &str = "h1.article-header--title";
pub const AUTHOR_SELECTOR: &str = "a.author-post__author-title";
pub const DATE_SELECTOR: &str = "time.article-header--date";
pub const CATEGORY_SELECTOR: &str = ".meta-box--tags a";
pub const SUMMARY_HEADING_SELECTOR: &str = "span.summary__heading";
pub const TEASER_SELECTOR: &str = ".article--post__teaser";
pub const CONTENT_SELECTOR: &str = ".article--single__content";

/// Lower-case phrase identifying the summary heading
pub const SUMMARY_MARKER: &str = "quick summary";

/// The teaser summary is whatever follows the last occurrence of this
pub const TEASER_SEPARATOR: char = '—';

/// Extracts an article record from page content
///
/// Never fails: fields that cannot be found are left as `None` or empty.
///
/// # Arguments
///
/// * `url` - The article URL, stored verbatim as the record identity
/// * `html` - The article page content
pub fn extract_article(url: &str, html: &str) -> ArticleRecord {
    let document = Html::parse_document(html);

    ArticleRecord {
        url: url.to_string(),
        title: first_text(&document, TITLE_SELECTOR),
        author: first_text(&document, AUTHOR_SELECTOR),
        date: first_text(&document, DATE_SELECTOR),
        categories: all_texts(&document, CATEGORY_SELECTOR),
        summary: extract_summary(&document),
        content: extract_content(&document),
    }
}

/// Trimmed text of an element and all its descendants
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first element matching `selector`
fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(element_text)
}

/// Trimmed texts of every element matching `selector`, in document order
fn all_texts(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .map(element_text)
        .collect()
}

/// Summary lookup with a teaser fallback
///
/// 1. A summary heading whose text contains [`SUMMARY_MARKER`] (any case);
///    the summary is the first `<p>` sibling following it.
/// 2. Otherwise the teaser text after the last [`TEASER_SEPARATOR`].
fn extract_summary(document: &Html) -> Option<String> {
    if let Some(heading) = find_summary_heading(document) {
        return next_sibling_paragraph(heading).map(element_text);
    }

    teaser_summary(document)
}

fn find_summary_heading(document: &Html) -> Option<ElementRef<'_>> {
    let selector = Selector::parse(SUMMARY_HEADING_SELECTOR).ok()?;
    document.select(&selector).find(|heading| {
        heading
            .text()
            .collect::<String>()
            .to_lowercase()
            .contains(SUMMARY_MARKER)
    })
}

fn next_sibling_paragraph(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "p")
}

fn teaser_summary(document: &Html) -> Option<String> {
    let selector = Selector::parse(TEASER_SELECTOR).ok()?;
    let teaser = document.select(&selector).next()?;
    let text = teaser.text().collect::<String>();
    let tail = text.rsplit(TEASER_SEPARATOR).next().unwrap_or_default();
    Some(tail.trim().to_string())
}

/// Paragraph texts of the content container, concatenated without separator
fn extract_content(document: &Html) -> Option<String> {
    let container_selector = Selector::parse(CONTENT_SELECTOR).ok()?;
    let paragraph_selector = Selector::parse("p").ok()?;

    let container = document.select(&container_selector).next()?;
    Some(
        container
            .select(&paragraph_selector)
            .map(element_text)
            .collect(),
    )
}
