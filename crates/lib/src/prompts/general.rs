//! # General Answer Prompts

/// The system prompt for questions that are not about interview preparation.
pub const GENERAL_ANSWER_SYSTEM_PROMPT: &str = "You are a helpful and friendly general-purpose AI assistant. Answer clearly and concisely.";

/// The user prompt for general answers.
///
/// Placeholders: `{history}`, `{prompt}`
pub const GENERAL_ANSWER_USER_PROMPT: &str = r#"Conversation so far:
{history}

Question:
{prompt}"#;
