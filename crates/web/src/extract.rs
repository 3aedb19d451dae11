//! Content-type keyed text extractors.
//!
//! Each [`ContentKind`] maps to one [`Extractor`]. The table starts with the
//! built-in HTML, PDF and plain-text extractors, and any entry can be replaced.

use crate::WebFetchError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use edgecoach::providers::fetch::ContentKind;
use std::{collections::HashMap, fmt::Debug};

/// Longest title taken from the first line of a plain-text document.
const MAX_TEXT_TITLE_CHARS: usize = 150;

/// Text pulled out of one response body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub title: Option<String>,
    pub text: String,
}

/// A trait for turning a downloaded body into readable text.
#[async_trait]
pub trait Extractor: Send + Sync + Debug + DynClone {
    async fn extract(&self, body: Vec<u8>) -> Result<ExtractedText, WebFetchError>;
}

dyn_clone::clone_trait_object!(Extractor);

/// Readability-style extraction with the markup-stripping fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

#[async_trait]
impl Extractor for HtmlExtractor {
    async fn extract(&self, body: Vec<u8>) -> Result<ExtractedText, WebFetchError> {
        let html = String::from_utf8_lossy(&body);
        let doc = edgecoach_html::html_to_text(&html);
        Ok(ExtractedText {
            title: doc.title,
            text: doc.text,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

#[async_trait]
impl Extractor for PdfExtractor {
    async fn extract(&self, body: Vec<u8>) -> Result<ExtractedText, WebFetchError> {
        let text = edgecoach_pdf::extract_text(body).await?;
        Ok(ExtractedText { title: None, text })
    }
}

/// Decodes the body as UTF-8 and uses its first non-empty line as the title.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

#[async_trait]
impl Extractor for PlainTextExtractor {
    async fn extract(&self, body: Vec<u8>) -> Result<ExtractedText, WebFetchError> {
        let text = String::from_utf8_lossy(&body).into_owned();
        let title = text
            .lines()
            .map(|line| line.trim_start_matches(|c: char| c == '#' || c.is_whitespace()).trim())
            .find(|line| !line.is_empty())
            .map(|line| line.chars().take(MAX_TEXT_TITLE_CHARS).collect::<String>());
        Ok(ExtractedText { title, text })
    }
}

/// The extractor strategy table consulted for every fetched page.
#[derive(Debug, Clone)]
pub struct ExtractorTable {
    extractors: HashMap<ContentKind, Box<dyn Extractor>>,
}

impl Default for ExtractorTable {
    fn default() -> Self {
        Self::empty()
            .with(ContentKind::Html, Box::new(HtmlExtractor))
            .with(ContentKind::Pdf, Box::new(PdfExtractor))
            .with(ContentKind::PlainText, Box::new(PlainTextExtractor))
    }
}

impl ExtractorTable {
    /// A table with no extractors; every fetch fails as unsupported.
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registers `extractor` for `kind`, replacing any previous entry.
    pub fn with(mut self, kind: ContentKind, extractor: Box<dyn Extractor>) -> Self {
        self.extractors.insert(kind, extractor);
        self
    }

    pub fn get(&self, kind: ContentKind) -> Option<&dyn Extractor> {
        self.extractors.get(&kind).map(|e| e.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_title_from_first_line() {
        let body = b"\n\n# Globex PM interview notes\nRound one was a product sense case.".to_vec();
        let extracted = PlainTextExtractor.extract(body).await.unwrap();
        assert_eq!(extracted.title.as_deref(), Some("Globex PM interview notes"));
        assert!(extracted.text.contains("product sense case"));
    }

    #[test]
    fn test_default_table_covers_every_kind() {
        let table = ExtractorTable::default();
        for kind in [ContentKind::Html, ContentKind::Pdf, ContentKind::PlainText] {
            assert!(table.get(kind).is_some(), "missing extractor for {kind:?}");
        }
        assert!(ExtractorTable::empty().get(ContentKind::Html).is_none());
    }
}
