//! # edgecoach-web: Web Page Fetching Plugin
//!
//! Implements the core [`PageFetcher`] seam over HTTP. A page is downloaded,
//! its format detected from the `Content-Type` header and URL, and its text
//! produced by the matching entry of an [`ExtractorTable`].

pub mod extract;

use async_trait::async_trait;
use edgecoach::{
    constants::USER_AGENT,
    providers::fetch::{ContentKind, FetchedPage, PageFetcher},
    FetchError,
};
use edgecoach_pdf::PdfExtractError;
use reqwest::{header::CONTENT_TYPE, Client as ReqwestClient};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

pub use extract::{
    ExtractedText, Extractor, ExtractorTable, HtmlExtractor, PdfExtractor, PlainTextExtractor,
};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
/// Bodies larger than this are not worth extracting.
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

const UNSUPPORTED_MEDIA_PREFIXES: &[&str] = &["image/", "video/", "audio/", "font/"];

// --- Error Definitions ---

#[derive(Error, Debug)]
pub enum WebFetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to fetch content: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Page request failed with status {status}")]
    Status { status: u16 },
    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),
    #[error("Response body too large ({0} bytes)")]
    TooLarge(usize),
    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] PdfExtractError),
}

impl From<WebFetchError> for FetchError {
    fn from(err: WebFetchError) -> Self {
        match err {
            WebFetchError::Status { status } => FetchError::Status(status),
            WebFetchError::UnsupportedContent(kind) => FetchError::UnsupportedContent(kind),
            WebFetchError::TooLarge(size) => {
                FetchError::UnsupportedContent(format!("body of {size} bytes"))
            }
            WebFetchError::Pdf(e) => FetchError::Extraction(e.to_string()),
            WebFetchError::ClientBuild(e) | WebFetchError::Request(e) => {
                FetchError::Request(e.to_string())
            }
        }
    }
}

// --- Fetcher ---

/// An HTTP [`PageFetcher`] with a pluggable extractor table.
#[derive(Debug, Clone)]
pub struct WebFetcher {
    client: ReqwestClient,
    extractors: ExtractorTable,
}

impl WebFetcher {
    pub fn new(timeout: Duration) -> Result<Self, WebFetchError> {
        let client = ReqwestClient::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(WebFetchError::ClientBuild)?;
        Ok(Self {
            client,
            extractors: ExtractorTable::default(),
        })
    }

    /// Replaces the extractor table.
    pub fn with_extractors(mut self, extractors: ExtractorTable) -> Self {
        self.extractors = extractors;
        self
    }

    /// Downloads `url` and extracts its text, without the core error mapping.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, WebFetchError> {
        let mut response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(WebFetchError::Status {
                status: response.status().as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());
        if let Some(ct) = content_type.as_deref() {
            if UNSUPPORTED_MEDIA_PREFIXES.iter().any(|p| ct.starts_with(p)) {
                return Err(WebFetchError::UnsupportedContent(ct.to_string()));
            }
        }
        let kind = ContentKind::detect(content_type.as_deref(), url);
        let extractor = self
            .extractors
            .get(kind)
            .ok_or_else(|| WebFetchError::UnsupportedContent(format!("{kind:?}")))?;

        if let Some(declared) = response.content_length() {
            if declared > MAX_BODY_BYTES as u64 {
                return Err(WebFetchError::TooLarge(declared as usize));
            }
        }
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(WebFetchError::TooLarge(body.len() + chunk.len()));
            }
            body.extend_from_slice(&chunk);
        }

        let extracted = extractor.extract(body).await?;
        debug!(
            ?kind,
            chars = extracted.text.chars().count(),
            "Extracted page text"
        );
        Ok(FetchedPage {
            title: extracted.title.filter(|t| !t.trim().is_empty()),
            text: extracted.text,
            kind,
        })
    }
}

#[async_trait]
impl PageFetcher for WebFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Ok(self.fetch_page(url).await?)
    }
}
