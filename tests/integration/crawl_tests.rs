//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a fake article site and run full
//! crawls against it end-to-end.

use quire::config::{
    Config, CrawlerConfig, OutputConfig, OutputFormat, SiteConfig, UserAgentConfig,
};
use quire::crawler::Coordinator;
use quire::storage::{ArticleRecord, ArticleStore, JsonFileStore};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock site
fn create_test_config(base_url: &str, output_path: &Path, article_concurrency: u32) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            ..SiteConfig::default()
        },
        crawler: CrawlerConfig {
            page_concurrency: 3,
            article_concurrency,
            politeness_delay: 5, // Very short for testing
            max_pages: 50,
            request_timeout: 500,
            crawl_deadline: None,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: None,
        },
        output: OutputConfig {
            path: output_path.display().to_string(),
            format: OutputFormat::Json,
            report_path: None,
        },
    }
}

fn listing_page(slugs: &[String]) -> String {
    let entries: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<article class="article--post">
                     <h2 class="article--post__title"><a href="/articles/{slug}/">{slug}</a></h2>
                     <p class="article--post__teaser"><time>Jan 1</time> — Teaser of {slug}</p>
                   </article>"#,
                slug = slug
            )
        })
        .collect();
    format!("<html><body><main>{}</main></body></html>", entries)
}

fn article_page(slug: &str) -> String {
    format!(
        r#"<html><body>
            <header>
                <h1 class="article-header--title">Title of {slug}</h1>
                <a class="author-post__author-title" href="/author/jane/">Jane Doe</a>
                <time class="article-header--date">January 1, 2024</time>
            </header>
            <ul class="meta-box--tags"><li><a href="/category/css">CSS</a></li><li><a href="/category/ux">UX</a></li></ul>
            <section><span class="summary__heading">Quick summary ↬</span><p>Summary of {slug}.</p></section>
            <div class="article--single__content">
                <p>Intro of {slug}.</p>
                <p>Body of {slug}.</p>
            </div>
        </body></html>"#,
        slug = slug
    )
}

fn full_record(base_url: &str, slug: &str) -> ArticleRecord {
    ArticleRecord {
        url: format!("{}/articles/{}/", base_url, slug),
        title: Some(format!("Title of {}", slug)),
        author: Some("Jane Doe".to_string()),
        date: Some("January 1, 2024".to_string()),
        categories: vec!["CSS".to_string(), "UX".to_string()],
        summary: Some(format!("Summary of {}.", slug)),
        content: Some(format!("Intro of {}.Body of {}.", slug, slug)),
    }
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Mounts a site whose first index page lists `count` articles
async fn mount_site(server: &MockServer, count: usize) -> Vec<String> {
    let slugs: Vec<String> = (0..count).map(|n| format!("post-{:02}", n)).collect();
    mount_html(server, "/articles/", listing_page(&slugs)).await;
    for slug in &slugs {
        mount_html(server, &format!("/articles/{}/", slug), article_page(slug)).await;
    }
    slugs
}

fn by_url(records: Vec<ArticleRecord>) -> HashMap<String, ArticleRecord> {
    records.into_iter().map(|r| (r.url.clone(), r)).collect()
}

fn read_json_output(path: &Path) -> Vec<ArticleRecord> {
    let content = std::fs::read_to_string(path).expect("Failed to read output");
    serde_json::from_str(&content).expect("Output is not valid JSON")
}

#[tokio::test]
async fn test_two_page_site_with_timed_out_article() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Page 1 lists A and B, page 2 lists nothing
    mount_html(
        &mock_server,
        "/articles/",
        listing_page(&["a".to_string(), "b".to_string()]),
    )
    .await;
    mount_html(&mock_server, "/articles/page/2/", listing_page(&[])).await;

    mount_html(&mock_server, "/articles/a/", article_page("a")).await;

    // B answers far later than the request timeout
    Mock::given(method("GET"))
        .and(path("/articles/b/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_page("b"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("articles.json");
    let config = create_test_config(&base_url, &output, 2);

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.links_discovered, 2);
    assert_eq!(report.articles_processed, 2);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.persist_failures, 0);
    assert_eq!(report.terminal_page, Some(2));

    let records = by_url(read_json_output(&output));
    assert_eq!(records.len(), 2);

    let a_url = format!("{}/articles/a/", base_url);
    let b_url = format!("{}/articles/b/", base_url);
    assert_eq!(records[&a_url], full_record(&base_url, "a"));
    assert_eq!(records[&b_url], ArticleRecord::empty(b_url.clone()));

    // Absent fields are written as explicit nulls
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let b_raw = raw
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["url"] == b_url.as_str())
        .unwrap();
    assert!(b_raw["title"].is_null());
    assert!(b_raw["content"].is_null());
}

#[tokio::test]
async fn test_pool_size_does_not_change_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let slugs = mount_site(&mock_server, 20).await;

    let dir = TempDir::new().unwrap();
    let mut outputs = Vec::new();

    for pool_size in [1, 10] {
        let output = dir.path().join(format!("articles-{}.json", pool_size));
        let config = create_test_config(&base_url, &output, pool_size);

        let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
        let report = coordinator.run().await.expect("Crawl failed");
        assert_eq!(report.articles_processed, 20);
        assert_eq!(report.fetch_failures, 0);

        outputs.push(by_url(read_json_output(&output)));
    }

    assert_eq!(outputs[0].len(), 20);
    assert_eq!(outputs[0], outputs[1]);
    for slug in &slugs {
        let url = format!("{}/articles/{}/", base_url, slug);
        assert_eq!(outputs[0][&url], full_record(&base_url, slug));
    }
}

#[tokio::test]
async fn test_empty_index_produces_empty_output() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/articles/", listing_page(&[])).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("articles.json");

    // Stale output from an earlier run
    std::fs::write(&output, r#"[{"url": "https://old.example/x/"}]"#).unwrap();

    let config = create_test_config(&mock_server.uri(), &output, 2);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.links_discovered, 0);
    assert_eq!(report.articles_processed, 0);
    assert_eq!(report.terminal_page, Some(1));
    assert!(read_json_output(&output).is_empty());
}

#[tokio::test]
async fn test_malformed_existing_output_is_not_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server, 3).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("articles.json");
    std::fs::write(&output, "[{ truncated").unwrap();

    let config = create_test_config(&base_url, &output, 2);
    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    assert_eq!(read_json_output(&output).len(), 3);
}

#[tokio::test]
async fn test_missing_article_yields_bare_record() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Only "kept" has an article page; "gone" answers 404
    mount_html(
        &mock_server,
        "/articles/",
        listing_page(&["kept".to_string(), "gone".to_string()]),
    )
    .await;
    mount_html(&mock_server, "/articles/kept/", article_page("kept")).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("articles.json");
    let config = create_test_config(&base_url, &output, 2);

    let report = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(report.fetch_failures, 1);
    let records = by_url(read_json_output(&output));
    let gone = format!("{}/articles/gone/", base_url);
    assert!(records[&gone].is_bare());
    assert_eq!(
        records[&format!("{}/articles/kept/", base_url)],
        full_record(&base_url, "kept")
    );
}

#[tokio::test]
async fn test_crawl_deadline_records_unfinished_articles() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let slugs: Vec<String> = (0..4).map(|n| format!("slow-{}", n)).collect();
    mount_html(&mock_server, "/articles/", listing_page(&slugs)).await;
    for slug in &slugs {
        Mock::given(method("GET"))
            .and(path(format!("/articles/{}/", slug)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(article_page(slug))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("articles.json");
    let mut config = create_test_config(&base_url, &output, 4);
    config.crawler.request_timeout = 10_000;
    config.crawler.crawl_deadline = Some(1_000);

    let report = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(report.articles_processed, 4);
    assert_eq!(report.fetch_failures, 4);

    let records = read_json_output(&output);
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(ArticleRecord::is_bare));
}

#[tokio::test]
async fn test_sqlite_output_backend() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let slugs = mount_site(&mock_server, 5).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("articles.db");
    let mut config = create_test_config(&base_url, &output, 3);
    config.output.format = OutputFormat::Sqlite;

    let coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed");

    let records = by_url(coordinator.store().load().expect("Failed to load"));
    assert_eq!(records.len(), 5);
    for slug in &slugs {
        let url = format!("{}/articles/{}/", base_url, slug);
        assert_eq!(records[&url], full_record(&base_url, slug));
    }
}

#[tokio::test]
async fn test_explicit_store_receives_records() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_site(&mock_server, 2).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("custom.json");
    let store: Arc<dyn ArticleStore> = Arc::new(JsonFileStore::new(&output));
    let config = create_test_config(&base_url, &dir.path().join("unused.json"), 2);

    let coordinator = Coordinator::with_store(config, store).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.output_location, output.display().to_string());
    assert_eq!(read_json_output(&output).len(), 2);
    assert!(!dir.path().join("unused.json").exists());
}
