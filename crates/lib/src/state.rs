//! # Conversation State Codec
//!
//! The pipeline is stateless between requests: everything it needs to remember
//! (company, role, timeframe, previously found sources) travels inside the chat
//! transcript as a hidden system message. This module is the only place that
//! knows about that encoding. Inside the pipeline the state is an ordinary
//! struct passed by reference.

use crate::{
    constants::STATE_PREFIX,
    types::{ChatMessage, Intent, Source, ROLE_SYSTEM},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Continuity data carried from one turn to the next.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationState {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub time_to_interview: Option<String>,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub last_intent: Intent,
}

fn hidden_payload(message: &ChatMessage) -> Option<&str> {
    if message.role != ROLE_SYSTEM {
        return None;
    }
    message.content.strip_prefix(STATE_PREFIX)
}

/// Returns true if the message is a hidden state record.
pub fn is_state_record(message: &ChatMessage) -> bool {
    hidden_payload(message).is_some()
}

/// Restores the conversation state from a transcript.
///
/// The last well-formed record wins. Malformed records are skipped, and a
/// transcript without any record yields the default (empty) state.
pub fn decode(transcript: &[ChatMessage]) -> ConversationState {
    let mut state = None;
    for payload in transcript.iter().filter_map(hidden_payload) {
        match serde_json::from_str::<ConversationState>(payload) {
            Ok(parsed) => state = Some(parsed),
            Err(e) => warn!("Ignoring malformed conversation state record: {e}"),
        }
    }
    let state = state.unwrap_or_default();
    debug!(
        company = ?state.company,
        role = ?state.role,
        sources = state.sources.len(),
        "Decoded conversation state"
    );
    state
}

/// Writes the state into a transcript.
///
/// Any existing hidden record is removed and the new one is appended at the end;
/// visible messages are left untouched and keep their order.
pub fn encode(state: &ConversationState, transcript: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut out = visible_messages(transcript);
    match serde_json::to_string(state) {
        Ok(json) => out.push(ChatMessage::new(
            ROLE_SYSTEM,
            format!("{STATE_PREFIX}{json}"),
        )),
        Err(e) => error!("Failed to serialize conversation state: {e}"),
    }
    out
}

/// The transcript without hidden state records.
pub fn visible_messages(transcript: &[ChatMessage]) -> Vec<ChatMessage> {
    transcript
        .iter()
        .filter(|m| !is_state_record(m))
        .cloned()
        .collect()
}
