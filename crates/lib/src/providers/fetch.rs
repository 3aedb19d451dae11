//! # Page Fetching Seam
//!
//! The retrieval engine does not know how pages are downloaded or how text is
//! pulled out of them. Plugin crates (such as `edgecoach-web`) implement
//! [`PageFetcher`] and are handed to the engine at construction time.

use crate::errors::FetchError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The document format detected for a fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Html,
    Pdf,
    PlainText,
}

impl ContentKind {
    /// Detects the format from a `Content-Type` header value and the URL.
    ///
    /// A `.pdf` URL wins over a generic header, since many servers send PDFs as
    /// `application/octet-stream`. Unknown types are treated as HTML.
    pub fn detect(content_type: Option<&str>, url: &str) -> Self {
        let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.contains("pdf") || path.ends_with(".pdf") {
            ContentKind::Pdf
        } else if content_type.contains("html") || content_type.contains("xml") {
            ContentKind::Html
        } else if content_type.starts_with("text/")
            || path.ends_with(".txt")
            || path.ends_with(".md")
        {
            ContentKind::PlainText
        } else {
            ContentKind::Html
        }
    }
}

/// The text extracted from one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub title: Option<String>,
    pub text: String,
    pub kind: ContentKind,
}

/// A trait for downloading a page and extracting its readable text.
#[async_trait]
pub trait PageFetcher: Send + Sync + Debug + DynClone {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}

dyn_clone::clone_trait_object!(PageFetcher);
