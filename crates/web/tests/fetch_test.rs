//! # Web Fetcher Tests
//!
//! Drives `WebFetcher` against a local mock server for each content kind.

use async_trait::async_trait;
use edgecoach::{
    providers::fetch::{ContentKind, PageFetcher},
    FetchError,
};
use edgecoach_test_utils::helpers::generate_test_pdf;
use edgecoach_web::{
    ExtractedText, Extractor, ExtractorTable, WebFetchError, WebFetcher, DEFAULT_FETCH_TIMEOUT,
    MAX_BODY_BYTES,
};
use std::sync::Once;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initializes tracing for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

fn url_for(server: &MockServer, route: &str) -> String {
    Url::parse(&server.uri())
        .unwrap()
        .join(route)
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_fetch_html_page() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    let html = r#"<html><head><title>Acme Interview Recap</title></head><body>
        <nav><p>Login</p></nav>
        <article><p>The recruiter screen lasted thirty minutes.</p><p>The onsite had four rounds.</p></article>
        </body></html>"#;

    Mock::given(method("GET"))
        .and(path("/recap"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let fetcher = WebFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();

    // --- 2. Act ---
    let page = fetcher.fetch(&url_for(&server, "/recap")).await.unwrap();

    // --- 3. Assert ---
    assert_eq!(page.kind, ContentKind::Html);
    assert_eq!(page.title.as_deref(), Some("Acme Interview Recap"));
    assert!(page.text.contains("recruiter screen lasted thirty minutes"));
    assert!(!page.text.contains("Login"));
}

#[tokio::test]
async fn test_fetch_pdf_by_content_type() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    let pdf_data = generate_test_pdf(&["Acme interview guide", "Round 1: coding"]).unwrap();

    Mock::given(method("GET"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(pdf_data, "application/pdf"))
        .mount(&server)
        .await;

    let fetcher = WebFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();

    // --- 2. Act ---
    let result = fetcher.fetch(&url_for(&server, "/download")).await;

    // --- 3. Assert ---
    let page = result.expect("PDF should be extracted");
    assert_eq!(page.kind, ContentKind::Pdf);
    assert_eq!(page.title, None);
}

#[tokio::test]
async fn test_fetch_plain_text() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    let body = "Globex data analyst loop\n\nSQL screen, then a case study with the hiring manager.";

    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain"))
        .mount(&server)
        .await;

    let fetcher = WebFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();

    // --- 2. Act ---
    let page = fetcher.fetch(&url_for(&server, "/notes.txt")).await.unwrap();

    // --- 3. Assert ---
    assert_eq!(page.kind, ContentKind::PlainText);
    assert_eq!(page.title.as_deref(), Some("Globex data analyst loop"));
    assert!(page.text.contains("case study with the hiring manager"));
}

#[tokio::test]
async fn test_fetch_error_status_maps_to_fetch_error() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&server)
        .await;

    let fetcher = WebFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();
    let url = url_for(&server, "/missing");

    // --- 2. Act ---
    let raw = fetcher.fetch_page(&url).await;
    let mapped = fetcher.fetch(&url).await;

    // --- 3. Assert ---
    assert!(matches!(raw, Err(WebFetchError::Status { status: 404 })));
    assert!(matches!(mapped, Err(FetchError::Status(404))));
}

#[tokio::test]
async fn test_fetch_rejects_images() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logo"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2], "image/png"))
        .mount(&server)
        .await;

    let fetcher = WebFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();
    let result = fetcher.fetch(&url_for(&server, "/logo")).await;

    assert!(matches!(result, Err(FetchError::UnsupportedContent(_))));
}

#[tokio::test]
async fn test_fetch_rejects_oversized_body() {
    setup_tracing();
    let server = MockServer::start().await;
    let body = vec![b'a'; MAX_BODY_BYTES + 1];

    Mock::given(method("GET"))
        .and(path("/huge"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain"))
        .mount(&server)
        .await;

    let fetcher = WebFetcher::new(DEFAULT_FETCH_TIMEOUT).unwrap();
    let result = fetcher.fetch_page(&url_for(&server, "/huge")).await;

    assert!(matches!(result, Err(WebFetchError::TooLarge(size)) if size > MAX_BODY_BYTES));
}

#[tokio::test]
async fn test_fetch_times_out_on_slow_page() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fetcher = WebFetcher::new(Duration::from_millis(200)).unwrap();
    let result = fetcher.fetch(&url_for(&server, "/slow")).await;

    assert!(matches!(result, Err(FetchError::Request(_))));
}

#[derive(Debug, Clone)]
struct ShoutingExtractor;

#[async_trait]
impl Extractor for ShoutingExtractor {
    async fn extract(&self, body: Vec<u8>) -> Result<ExtractedText, WebFetchError> {
        Ok(ExtractedText {
            title: Some("custom".to_string()),
            text: String::from_utf8_lossy(&body).to_uppercase(),
        })
    }
}

#[tokio::test]
async fn test_substituted_extractor_is_used() {
    // --- 1. Arrange ---
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>quiet</p>", "text/html"))
        .mount(&server)
        .await;

    let table = ExtractorTable::default().with(ContentKind::Html, Box::new(ShoutingExtractor));
    let fetcher = WebFetcher::new(DEFAULT_FETCH_TIMEOUT)
        .unwrap()
        .with_extractors(table);

    // --- 2. Act ---
    let page = fetcher.fetch(&url_for(&server, "/page")).await.unwrap();

    // --- 3. Assert ---
    assert_eq!(page.title.as_deref(), Some("custom"));
    assert_eq!(page.text, "<P>QUIET</P>");
}

#[tokio::test]
async fn test_missing_extractor_is_unsupported() {
    setup_tracing();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<p>hi</p>", "text/html"))
        .mount(&server)
        .await;

    let fetcher = WebFetcher::new(DEFAULT_FETCH_TIMEOUT)
        .unwrap()
        .with_extractors(ExtractorTable::empty());
    let result = fetcher.fetch(&url_for(&server, "/page")).await;

    assert!(matches!(result, Err(FetchError::UnsupportedContent(_))));
}
