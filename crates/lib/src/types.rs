//! # Core Data Model
//!
//! Wire and pipeline types shared by every stage: chat envelopes, retrieved
//! sources, intent determinations and the synthesized preparation guide.

use crate::errors::CoachError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- Transcript ---

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";
pub const ROLE_SYSTEM: &str = "system";

/// One entry of the chat transcript exchanged with the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ROLE_USER, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ROLE_ASSISTANT, content)
    }
}

/// The request envelope received from the chat surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(query: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            query: query.into(),
            messages,
        }
    }

    /// Validates a loosely-typed JSON payload into a request envelope.
    ///
    /// A missing or blank `query`, or a `messages` field that is not a list of
    /// `{role, content}` objects, is the only hard failure of the system.
    pub fn from_value(value: Value) -> Result<Self, CoachError> {
        let Value::Object(mut body) = value else {
            return Err(CoachError::InvalidRequest(
                "Request body must be a JSON object.".to_string(),
            ));
        };

        let query = match body.remove("query") {
            Some(Value::String(q)) if !q.trim().is_empty() => q.trim().to_string(),
            _ => {
                return Err(CoachError::InvalidRequest(
                    "Missing 'query' in request body.".to_string(),
                ))
            }
        };

        let messages = match body.remove("messages") {
            None | Some(Value::Null) => Vec::new(),
            Some(raw @ Value::Array(_)) => serde_json::from_value(raw).map_err(|e| {
                CoachError::InvalidRequest(format!("'messages' must be a list of turns: {e}"))
            })?,
            Some(_) => {
                return Err(CoachError::InvalidRequest(
                    "'messages' must be a list of turns.".to_string(),
                ))
            }
        };

        Ok(Self { query, messages })
    }
}

/// The response envelope returned to the chat surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub intent: Intent,
    pub confidence: Confidence,
    pub answer: String,
    pub sources: Vec<SourceRef>,
    pub messages: Vec<ChatMessage>,
}

// --- Intent ---

/// The route chosen for a request. Decided once and never re-inspected downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    #[default]
    General,
    InterviewIntel,
}

/// Coarse reliability marker attached to an intent determination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    /// Produced by the generative backend with a schema-valid answer.
    High,
    /// Produced by the deterministic heuristic fallback.
    Low,
}

/// The classifier's determination for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentResult {
    pub is_interview_intel: bool,
    pub company: Option<String>,
    pub role: Option<String>,
    pub timeframe: Option<String>,
    pub hours_until_interview: u32,
    pub confidence: Confidence,
}

impl IntentResult {
    pub fn intent(&self) -> Intent {
        if self.is_interview_intel {
            Intent::InterviewIntel
        } else {
            Intent::General
        }
    }

    /// True when at least one of company or role is known.
    pub fn has_target(&self) -> bool {
        self.company.is_some() || self.role.is_some()
    }
}

// --- Sources ---

/// A retrieved candidate source with its cleaned body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub url: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub snippet: String,
    pub retrieved_at: DateTime<Utc>,
}

impl Source {
    /// The host of the source URL without a leading `www.`, or `web` if it has none.
    pub fn domain(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "web".to_string())
    }

    pub fn to_ref(&self) -> SourceRef {
        SourceRef {
            url: self.url.clone(),
            title: self.title.clone(),
            domain: self.domain(),
            snippet: self.snippet.chars().take(300).collect(),
        }
    }
}

/// A citation of a source, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub url: String,
    pub title: String,
    pub domain: String,
    pub snippet: String,
}

// --- Synthesis ---

/// The structured interview preparation guide.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepGuide {
    pub rounds: Vec<String>,
    pub themes: Vec<String>,
    pub plan: Vec<String>,
    pub takeaways: Vec<String>,
    pub sources_used: Vec<SourceRef>,
}
