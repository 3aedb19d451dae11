//! # Intent Classification
//!
//! Decides once per request whether a query asks for interview intel, and which
//! company, role and timeframe it is about.
//!
//! Classification is a two-strategy chain. The primary strategy asks the
//! generative backend for a JSON verdict (`Confidence::High`). If that call
//! fails or returns something that does not validate, the deterministic
//! [`HeuristicIntentStrategy`] answers instead (`Confidence::Low`). Whatever the
//! source, the result is then post-processed the same way:
//!
//! 1. empty fields are filled from deterministic extraction on the query,
//! 2. concept questions ("what is ...", "explain ...") are routed to general,
//! 3. company, role and timeframe left empty are inherited from the prior state,
//! 4. the hours-until-interview estimate is recomputed from the final timeframe.

pub mod heuristic;
pub mod llm;
pub mod timeframe;

use crate::{
    errors::CoachError,
    state::ConversationState,
    types::{ChatMessage, IntentResult},
};
use async_trait::async_trait;
use std::fmt::Debug;
use tracing::{info, instrument, warn};

pub use heuristic::HeuristicIntentStrategy;
pub use llm::LlmIntentStrategy;

/// Everything a strategy may look at.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierInput<'a> {
    pub query: &'a str,
    /// Visible turns before the current query.
    pub history: &'a [ChatMessage],
    pub prior: &'a ConversationState,
}

/// One way of producing an intent determination.
#[async_trait]
pub trait IntentStrategy: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    async fn classify(&self, input: &ClassifierInput<'_>) -> Result<IntentResult, CoachError>;
}

/// The primary strategy with its deterministic fallback.
#[derive(Debug)]
pub struct IntentClassifier {
    primary: Box<dyn IntentStrategy>,
    fallback: HeuristicIntentStrategy,
}

impl IntentClassifier {
    pub fn new(primary: Box<dyn IntentStrategy>) -> Self {
        Self {
            primary,
            fallback: HeuristicIntentStrategy,
        }
    }

    /// A classifier that only uses the heuristics.
    pub fn heuristic_only() -> Self {
        Self::new(Box::new(HeuristicIntentStrategy))
    }

    #[instrument(skip_all, fields(strategy = self.primary.name()))]
    pub async fn classify(&self, input: ClassifierInput<'_>) -> IntentResult {
        let result = match self.primary.classify(&input).await {
            Ok(mut result) => {
                enrich(&mut result, input.query);
                result
            }
            Err(e) => {
                warn!("Falling back to heuristic intent classification: {e}");
                self.fallback.evaluate(input.query, input.prior)
            }
        };

        let result = finalize(result, input.query, input.prior);
        info!(
            intent = ?result.intent(),
            confidence = ?result.confidence,
            company = ?result.company,
            role = ?result.role,
            timeframe = ?result.timeframe,
            "Classified query"
        );
        result
    }
}

/// Fills fields the backend left empty from deterministic extraction.
fn enrich(result: &mut IntentResult, query: &str) {
    if result.company.is_some() && result.role.is_some() && result.timeframe.is_some() {
        return;
    }
    let extraction = heuristic::extract(query);
    if result.company.is_none() {
        result.company = extraction.company;
    }
    if result.role.is_none() {
        result.role = extraction.role;
    }
    if result.timeframe.is_none() {
        result.timeframe = extraction.timeframe;
    }
}

fn finalize(mut result: IntentResult, query: &str, prior: &ConversationState) -> IntentResult {
    if result.is_interview_intel && heuristic::is_concept_question(query) {
        info!("Concept question without interview context, routing to general");
        result.is_interview_intel = false;
    }

    if result.company.is_none() {
        result.company = prior.company.clone();
    }
    if result.role.is_none() {
        result.role = prior.role.clone();
    }
    if result.timeframe.is_none() {
        result.timeframe = prior.time_to_interview.clone();
    }
    result.hours_until_interview = timeframe::hours_until(result.timeframe.as_deref());
    result
}
