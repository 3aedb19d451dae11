pub mod gemini;
pub mod local;
pub mod retry;

use crate::errors::PromptError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

pub use retry::generate_with_retry;

/// A trait for interacting with a generative backend.
///
/// The backend receives a system prompt and a user prompt and returns free text.
/// Nothing guarantees that the text conforms to whatever shape the prompt asked
/// for; callers validate and parse it themselves.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str)
        -> Result<String, PromptError>;
}

dyn_clone::clone_trait_object!(AiProvider);
