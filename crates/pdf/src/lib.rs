//! # edgecoach-pdf: PDF Text Extraction
//!
//! Turns the bytes of a downloaded PDF into plain text for the retrieval
//! pipeline. Parsing is CPU-bound, so [`extract_text`] moves it onto the
//! blocking thread pool.

use pdf::{
    content::{Op, TextDrawAdjusted},
    file::FileOptions,
};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Error, Debug)]
pub enum PdfExtractError {
    #[error("Failed to parse PDF content: {0}")]
    Parse(String),
    #[error("PDF extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Extracts text from all pages of a PDF synchronously.
///
/// Pages are separated by a blank line. Text-show operators inside one page are
/// separated by spaces, and explicit line moves start a new line.
pub fn extract_text_from_pdf(pdf_data: &[u8]) -> Result<String, PdfExtractError> {
    let file = FileOptions::cached()
        .load(pdf_data)
        .map_err(|e| PdfExtractError::Parse(e.to_string()))?;
    let resolver = file.resolver();
    let mut pages = Vec::new();

    for page_num in 0..file.num_pages() {
        let page = file
            .get_page(page_num)
            .map_err(|e| PdfExtractError::Parse(e.to_string()))?;
        let Some(content) = &page.contents else {
            continue;
        };
        let operations = content
            .operations(&resolver)
            .map_err(|e| PdfExtractError::Parse(e.to_string()))?;

        let mut page_text = String::new();
        for op in operations.iter() {
            match op {
                Op::TextDraw { text } => push_run(&mut page_text, &text.to_string_lossy()),
                Op::TextDrawAdjusted { array } => {
                    for item in array {
                        if let TextDrawAdjusted::Text(text) = item {
                            push_run(&mut page_text, &text.to_string_lossy());
                        }
                    }
                }
                Op::TextNewline => page_text.push('\n'),
                _ => {}
            }
        }
        if !page_text.trim().is_empty() {
            pages.push(page_text.trim().to_string());
        }
    }

    debug!(pages = pages.len(), "Extracted text from PDF");
    Ok(pages.join("\n\n"))
}

fn push_run(buf: &mut String, run: &str) {
    if run.is_empty() {
        return;
    }
    if !buf.is_empty() && !buf.ends_with(char::is_whitespace) {
        buf.push(' ');
    }
    buf.push_str(run);
}

/// Extracts text on the blocking pool so parsing never stalls the runtime.
#[instrument(skip(pdf_data), fields(bytes = pdf_data.len()))]
pub async fn extract_text(pdf_data: Vec<u8>) -> Result<String, PdfExtractError> {
    tokio::task::spawn_blocking(move || extract_text_from_pdf(&pdf_data)).await?
}
