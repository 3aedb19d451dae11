//! # Backend Intent Strategy
//!
//! The primary classification strategy: ask the generative backend for a strict
//! JSON verdict and validate it key by key.

use super::{timeframe, ClassifierInput, IntentStrategy};
use crate::{
    errors::CoachError,
    prompts::{format_history, intent::INTENT_USER_PROMPT},
    providers::ai::{generate_with_retry, AiProvider},
    types::{Confidence, IntentResult},
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Visible turns included in the classification prompt.
const HISTORY_TURNS: usize = 10;
const HISTORY_CHARS_PER_TURN: usize = 600;

/// Classifies through the generative backend.
#[derive(Debug, Clone)]
pub struct LlmIntentStrategy {
    ai: Box<dyn AiProvider>,
    system_prompt: String,
    timeout: Duration,
}

impl LlmIntentStrategy {
    pub fn new(ai: Box<dyn AiProvider>, system_prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ai,
            system_prompt: system_prompt.into(),
            timeout,
        }
    }
}

/// Returns the outermost `{...}` span of a response, ignoring code fences or
/// chatter around it.
fn json_object_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}

fn optional_text(body: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match body.get(key) {
        None => Err(format!("missing key '{key}'")),
        Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim().trim_matches('"').trim();
            let blank = trimmed.is_empty()
                || matches!(
                    trimmed.to_ascii_lowercase().as_str(),
                    "null" | "none" | "unknown" | "n/a"
                );
            Ok((!blank).then(|| trimmed.to_string()))
        }
        Some(other) => Err(format!("'{key}' must be a string or null, got {other}")),
    }
}

/// Validates a backend response against the intent schema.
///
/// All four keys must be present with the right types; blank strings count as
/// null.
pub fn parse_intent_response(raw: &str) -> Result<IntentResult, String> {
    let span = json_object_span(raw).ok_or_else(|| "no JSON object in response".to_string())?;
    let value: Value = serde_json::from_str(span).map_err(|e| format!("invalid JSON: {e}"))?;
    let Value::Object(body) = value else {
        return Err("response is not a JSON object".to_string());
    };

    let is_interview_intel = match body.get("isInterviewIntel") {
        Some(Value::Bool(b)) => *b,
        Some(other) => return Err(format!("'isInterviewIntel' must be a boolean, got {other}")),
        None => return Err("missing key 'isInterviewIntel'".to_string()),
    };
    let company = optional_text(&body, "company")?;
    let role = optional_text(&body, "role")?;
    let timeframe = optional_text(&body, "timeframe")?;

    Ok(IntentResult {
        is_interview_intel,
        company,
        role,
        hours_until_interview: timeframe::hours_until(timeframe.as_deref()),
        timeframe,
        confidence: Confidence::High,
    })
}

#[async_trait]
impl IntentStrategy for LlmIntentStrategy {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn classify(&self, input: &ClassifierInput<'_>) -> Result<IntentResult, CoachError> {
        let history = format_history(input.history, HISTORY_TURNS, HISTORY_CHARS_PER_TURN, usize::MAX);
        let user_prompt = INTENT_USER_PROMPT
            .replace("{history}", &history)
            .replace("{prompt}", input.query);

        let raw = generate_with_retry(self.ai.as_ref(), &self.system_prompt, &user_prompt, self.timeout)
            .await
            .map_err(|e| CoachError::ClassificationDegraded(e.to_string()))?;
        debug!(response = %raw, "Intent backend responded");

        parse_intent_response(&raw).map_err(CoachError::ClassificationDegraded)
    }
}
