//! # EdgeCoach
//!
//! The core pipeline of an interview-preparation chat backend. A chat turn is
//! either answered as a general question or, when the user signals an upcoming
//! interview, turned into a sourced preparation guide:
//!
//! 1. [`state`] restores company, role and earlier sources from the transcript.
//! 2. [`intent`] classifies the query, with a heuristic fallback.
//! 3. [`retrieval`] searches the web and cleans candidate experiences.
//! 4. [`synthesis`] compresses them into a five-section guide.
//! 5. [`orchestrator`] wires the stages together and re-encodes the state.
//!
//! Backends are reached through the traits in [`providers`], so every stage can
//! be exercised with mocks.

pub mod constants;
pub mod errors;
pub mod intent;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod retrieval;
pub mod state;
pub mod synthesis;
pub mod types;

pub use errors::{CoachError, FetchError, PromptError, SearchError};
pub use intent::{IntentClassifier, IntentStrategy, LlmIntentStrategy};
pub use orchestrator::{GeneralResponder, Orchestrator, Stage};
pub use prompts::PromptSet;
pub use retrieval::{RetrievalConfig, RetrievalEngine};
pub use state::ConversationState;
pub use synthesis::{SynthesisConfig, SynthesisEngine};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, Confidence, Intent, IntentResult, PrepGuide, Source,
    SourceRef,
};
