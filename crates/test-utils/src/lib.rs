//! Shared mocks and fixtures for the `edgecoach` workspace tests.

use async_trait::async_trait;
use chrono::Utc;
use edgecoach::errors::{FetchError, PromptError, SearchError};
use edgecoach::providers::{
    ai::AiProvider,
    fetch::{ContentKind, FetchedPage, PageFetcher},
    search::{SearchHit, SearchProvider},
};
use edgecoach::types::Source;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// --- Mock AI Provider ---

#[derive(Clone, Debug)]
enum MockReply {
    Text(String),
    ApiError(String),
}

#[derive(Clone, Debug)]
pub struct MockAiProvider {
    responses: Arc<Mutex<Vec<(String, MockReply)>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), MockReply::Text(response.to_string())));
    }

    /// Makes every call whose system prompt contains `key` fail with an API error.
    pub fn add_error(&self, key: &str, message: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.push((key.to_string(), MockReply::ApiError(message.to_string())));
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls whose system prompt contains `key`.
    pub fn count_calls(&self, key: &str) -> usize {
        self.get_calls()
            .iter()
            .filter(|(system, _)| system.contains(key))
            .count()
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, PromptError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        let responses = self.responses.lock().unwrap();
        for (key, reply) in responses.iter() {
            if system_prompt.contains(key.as_str()) {
                return match reply {
                    MockReply::Text(text) => Ok(text.clone()),
                    MockReply::ApiError(message) => Err(PromptError::AiApi(message.clone())),
                };
            }
        }

        Err(PromptError::AiApi(format!(
            "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
        )))
    }
}

// --- Mock Search Provider ---

#[derive(Clone, Debug, Default)]
pub struct MockSearchProvider {
    results: Arc<Mutex<Vec<(String, Vec<SearchHit>)>>>,
    queries: Arc<Mutex<Vec<String>>>,
    missing_key: bool,
}

impl MockSearchProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that behaves as if no API key was configured.
    pub fn without_api_key() -> Self {
        Self {
            missing_key: true,
            ..Self::default()
        }
    }

    /// Returns `hits` for every query containing `key`. An empty key matches all queries.
    pub fn add_results(&self, key: &str, hits: Vec<SearchHit>) {
        self.results.lock().unwrap().push((key.to_string(), hits));
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.missing_key {
            return Err(SearchError::MissingApiKey);
        }

        let results = self.results.lock().unwrap();
        let hits = results
            .iter()
            .find(|(key, _)| query.contains(key.as_str()))
            .map(|(_, hits)| hits.iter().take(max_results).cloned().collect())
            .unwrap_or_default();
        Ok(hits)
    }
}

// --- Mock Page Fetcher ---

#[derive(Clone, Debug)]
enum MockPage {
    Page(FetchedPage),
    Status(u16),
}

/// A fetcher serving programmed pages. Unknown URLs answer with HTTP 404.
#[derive(Clone, Debug, Default)]
pub struct MockFetcher {
    pages: Arc<Mutex<HashMap<String, MockPage>>>,
    delays: Arc<Mutex<HashMap<String, Duration>>>,
    fetched: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&self, url: &str, title: Option<&str>, text: &str) {
        let page = FetchedPage {
            title: title.map(str::to_string),
            text: text.to_string(),
            kind: ContentKind::Html,
        };
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), MockPage::Page(page));
    }

    pub fn add_status(&self, url: &str, status: u16) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), MockPage::Status(status));
    }

    /// Delays the answer for `url`.
    pub fn add_delay(&self, url: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(url.to_string(), delay);
    }

    pub fn fetched_urls(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    /// The highest number of fetches observed running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.fetched.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(url).copied();
        // Yield so that concurrently polled fetches overlap.
        tokio::time::sleep(delay.unwrap_or(Duration::from_millis(10))).await;

        let page = self.pages.lock().unwrap().get(url).cloned();
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match page {
            Some(MockPage::Page(page)) => Ok(page),
            Some(MockPage::Status(status)) => Err(FetchError::Status(status)),
            None => Err(FetchError::Status(404)),
        }
    }
}

// --- Fixtures ---

pub fn search_hit(url: &str, title: &str, snippet: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: title.to_string(),
        snippet: snippet.to_string(),
        raw_content: None,
    }
}

/// A candidate-experience body long enough to pass the minimum content length.
pub fn experience_text(company: &str) -> String {
    format!(
        "I interviewed at {company} last month. The process started with a recruiter screen, \
         followed by a SQL assessment with window functions and joins. The onsite had four rounds: \
         a case study on retention metrics, a stakeholder communication round, a behavioral round \
         focused on conflict and ownership, and a final round with the hiring manager. They asked \
         me to walk through a dashboard I built and explain how I validated the numbers. Overall \
         the interviewers were friendly and the whole loop took about three weeks."
    )
}

pub fn source(url: &str, title: &str, text: &str) -> Source {
    Source {
        url: url.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        snippet: text.chars().take(120).collect(),
        retrieved_at: Utc::now(),
    }
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod helpers {
    use anyhow::Result;
    use printpdf::{
        BuiltinFont, Layer, Mm, Op, ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, Pt, TextItem,
        TextMatrix, TextRenderingMode,
    };

    /// Generates a single-page PDF with one line per entry of `lines`.
    pub fn generate_test_pdf(lines: &[&str]) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new("Interview Notes");
        let mut page = PdfPage::new(Mm(210.0), Mm(297.0), vec![]);
        let layer_id = doc.add_layer(&Layer::new("Layer 1"));

        let font_bytes = BuiltinFont::Helvetica.get_subset_font().bytes;
        let font = ParsedFont::from_bytes(&font_bytes, 0, &mut Vec::new())
            .ok_or_else(|| anyhow::anyhow!("Failed to parse built-in font"))?;
        let font_id = doc.add_font(&font);

        let mut ops = vec![
            Op::BeginLayer {
                layer_id: layer_id.clone(),
            },
            Op::SetFontSize {
                size: Pt(12.0),
                font: font_id.clone(),
            },
        ];
        for (i, line) in lines.iter().enumerate() {
            ops.extend([
                Op::StartTextSection,
                Op::SetTextMatrix {
                    matrix: TextMatrix::Translate(
                        Mm(10.0).into(),
                        Mm(280.0 - 8.0 * i as f32).into(),
                    ),
                },
                Op::SetTextRenderingMode {
                    mode: TextRenderingMode::Fill,
                },
                Op::WriteText {
                    items: vec![TextItem::Text(line.to_string())],
                    font: font_id.clone(),
                },
                Op::EndTextSection,
            ]);
        }
        ops.push(Op::EndLayer { layer_id });

        page.ops = ops;
        doc.pages.push(page);

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            eprintln!("PDF generation warnings: {warnings:?}");
        }
        Ok(bytes)
    }
}
