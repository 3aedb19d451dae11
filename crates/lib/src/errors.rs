use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to a generative backend.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider did not answer within {0:?}")]
    Timeout(Duration),
    #[error("AI provider returned an empty response")]
    EmptyResponse,
}

impl PromptError {
    /// Transport-level failures are worth a second attempt; API errors are not.
    pub fn is_transient(&self) -> bool {
        matches!(self, PromptError::AiRequest(_) | PromptError::Timeout(_))
    }
}

/// Errors raised by the web search capability.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search API key is missing")]
    MissingApiKey,
    #[error("Failed to send search request: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Search API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to parse search response: {0}")]
    Deserialization(String),
}

/// Errors raised while fetching or extracting a single candidate source.
///
/// These never escape the retrieval engine; a failing source is logged and dropped.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to fetch URL: {0}")]
    Request(String),
    #[error("URL returned HTTP status {0}")]
    Status(u16),
    #[error("Fetch did not complete within {0:?}")]
    Timeout(Duration),
    #[error("Unsupported content type: {0}")]
    UnsupportedContent(String),
    #[error("Text extraction failed: {0}")]
    Extraction(String),
    #[error("Extracted text is too short ({0} chars)")]
    TooShort(usize),
}

/// The pipeline's error taxonomy.
///
/// Apart from `InvalidRequest`, every variant has a degraded output defined by the
/// component that raises it and is never surfaced to the caller as a failure.
#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Intent classification degraded: {0}")]
    ClassificationDegraded(String),
    #[error("Neither company nor role could be resolved")]
    InsufficientContext,
    #[error("Source {url} could not be used: {reason}")]
    SourceFetchFailed { url: String, reason: FetchError },
    #[error("Synthesis output could not be parsed: {0}")]
    SynthesisParseFailed(String),
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<PromptError> for CoachError {
    fn from(err: PromptError) -> Self {
        CoachError::BackendUnavailable(err.to_string())
    }
}

impl From<SearchError> for CoachError {
    fn from(err: SearchError) -> Self {
        CoachError::BackendUnavailable(err.to_string())
    }
}
