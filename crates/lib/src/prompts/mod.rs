//! # Prompt Template Modules
//!
//! This module organizes all prompt templates used throughout the `edgecoach` library.
//! It is divided into sub-modules based on the pipeline stage that sends them.
//! The server may override any system prompt through its configuration.

pub mod general;
pub mod intent;
pub mod synthesis;

use crate::types::ChatMessage;
use serde::{Deserialize, Serialize};

/// The system prompts of the three backend calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSet {
    pub intent_system: String,
    pub synthesis_system: String,
    pub general_system: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            intent_system: intent::INTENT_SYSTEM_PROMPT.to_string(),
            synthesis_system: synthesis::SYNTHESIS_SYSTEM_PROMPT.to_string(),
            general_system: general::GENERAL_ANSWER_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Renders the last `max_turns` messages as `ROLE: content` lines.
///
/// Each message is cut to `max_chars_per_turn`; lines are dropped from the
/// oldest end once `max_total_chars` would be exceeded.
pub fn format_history(
    turns: &[ChatMessage],
    max_turns: usize,
    max_chars_per_turn: usize,
    max_total_chars: usize,
) -> String {
    let start = turns.len().saturating_sub(max_turns);
    let mut lines: Vec<String> = Vec::new();
    let mut total = 0usize;

    for turn in turns[start..].iter().rev() {
        let content: String = turn.content.trim().chars().take(max_chars_per_turn).collect();
        if content.is_empty() {
            continue;
        }
        let line = format!("{}: {}", turn.role.to_uppercase(), content);
        let len = line.chars().count();
        if total + len > max_total_chars {
            break;
        }
        total += len;
        lines.push(line);
    }

    if lines.is_empty() {
        return "(no previous messages)".to_string();
    }
    lines.reverse();
    lines.join("\n")
}
