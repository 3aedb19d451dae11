//! # Orchestrator
//!
//! Runs one request through the pipeline:
//!
//! `AwaitInput -> Classifying -> { GeneralAnswer | Retrieving -> Synthesizing } -> Responding`
//!
//! The conversation state is decoded from the transcript on entry, passed by
//! reference through the stages, and encoded back into the outgoing transcript
//! in `Responding`. Nothing is kept between requests.

use crate::{
    constants::{CLARIFICATION_ANSWER, GENERAL_FALLBACK_ANSWER},
    errors::CoachError,
    intent::{ClassifierInput, IntentClassifier},
    prompts::{format_history, general::GENERAL_ANSWER_USER_PROMPT},
    providers::ai::{generate_with_retry, AiProvider},
    retrieval::RetrievalEngine,
    state::{self, ConversationState},
    synthesis::{render_markdown, SynthesisEngine, SynthesisRequest},
    types::{ChatMessage, ChatRequest, ChatResponse, Intent, IntentResult, Source, SourceRef},
};
use std::{fmt, time::Duration};
use tracing::{debug, info, instrument, warn};

const GENERAL_HISTORY_TURNS: usize = 10;
const GENERAL_HISTORY_CHARS_PER_TURN: usize = 600;

/// The stages a request passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitInput,
    Classifying,
    GeneralAnswer,
    Retrieving,
    Synthesizing,
    Responding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::AwaitInput => "AWAIT_INPUT",
            Stage::Classifying => "CLASSIFYING",
            Stage::GeneralAnswer => "GENERAL_ANSWER",
            Stage::Retrieving => "RETRIEVING",
            Stage::Synthesizing => "SYNTHESIZING",
            Stage::Responding => "RESPONDING",
        };
        f.write_str(name)
    }
}

fn enter(stage: Stage) {
    debug!(%stage, "Entering stage");
}

/// Answers questions that are not about interview preparation.
#[derive(Debug, Clone)]
pub struct GeneralResponder {
    ai: Box<dyn AiProvider>,
    system_prompt: String,
    timeout: Duration,
}

impl GeneralResponder {
    pub fn new(ai: Box<dyn AiProvider>, system_prompt: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ai,
            system_prompt: system_prompt.into(),
            timeout,
        }
    }

    /// Never fails; a backend failure yields a fixed friendly reply.
    pub async fn answer(&self, query: &str, history: &[ChatMessage]) -> String {
        let history = format_history(
            history,
            GENERAL_HISTORY_TURNS,
            GENERAL_HISTORY_CHARS_PER_TURN,
            usize::MAX,
        );
        let user_prompt = GENERAL_ANSWER_USER_PROMPT
            .replace("{history}", &history)
            .replace("{prompt}", query);

        match generate_with_retry(self.ai.as_ref(), &self.system_prompt, &user_prompt, self.timeout)
            .await
        {
            Ok(answer) => answer.trim().to_string(),
            Err(e) => {
                warn!("General answer degraded: {}", CoachError::from(e));
                GENERAL_FALLBACK_ANSWER.to_string()
            }
        }
    }
}

/// What a routed path hands back to `Responding`.
struct Outcome {
    answer: String,
    sources: Vec<SourceRef>,
    state: ConversationState,
}

/// Composes the classifier, retrieval and synthesis engines.
#[derive(Debug)]
pub struct Orchestrator {
    classifier: IntentClassifier,
    retrieval: RetrievalEngine,
    synthesis: SynthesisEngine,
    general: GeneralResponder,
}

impl Orchestrator {
    pub fn new(
        classifier: IntentClassifier,
        retrieval: RetrievalEngine,
        synthesis: SynthesisEngine,
        general: GeneralResponder,
    ) -> Self {
        Self {
            classifier,
            retrieval,
            synthesis,
            general,
        }
    }

    /// Handles one chat turn.
    ///
    /// Only a blank query is an error; every backend failure has a degraded
    /// answer.
    #[instrument(skip_all, fields(query = %request.query))]
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatResponse, CoachError> {
        enter(Stage::AwaitInput);
        let query = request.query.trim();
        if query.is_empty() {
            return Err(CoachError::InvalidRequest(
                "Missing 'query' in request body.".to_string(),
            ));
        }

        let prior = state::decode(&request.messages);
        let history = state::visible_messages(&request.messages);

        enter(Stage::Classifying);
        let intent = self
            .classifier
            .classify(ClassifierInput {
                query,
                history: &history,
                prior: &prior,
            })
            .await;

        let outcome = match intent.intent() {
            Intent::General => {
                enter(Stage::GeneralAnswer);
                Outcome {
                    answer: self.general.answer(query, &history).await,
                    sources: Vec::new(),
                    state: ConversationState {
                        last_intent: Intent::General,
                        ..prior
                    },
                }
            }
            Intent::InterviewIntel if !intent.has_target() => {
                info!("Interview intel requested without a company or role, asking for clarification");
                Outcome {
                    answer: CLARIFICATION_ANSWER.to_string(),
                    sources: Vec::new(),
                    state: ConversationState {
                        time_to_interview: intent.timeframe.clone(),
                        last_intent: Intent::InterviewIntel,
                        ..prior
                    },
                }
            }
            Intent::InterviewIntel => self.interview_intel(query, &history, &intent, prior).await,
        };

        enter(Stage::Responding);
        let mut transcript = history;
        transcript.push(ChatMessage::user(query));
        transcript.push(ChatMessage::assistant(outcome.answer.clone()));
        let messages = state::encode(&outcome.state, &transcript);

        Ok(ChatResponse {
            intent: intent.intent(),
            confidence: intent.confidence,
            answer: outcome.answer,
            sources: outcome.sources,
            messages,
        })
    }

    async fn interview_intel(
        &self,
        query: &str,
        history: &[ChatMessage],
        intent: &IntentResult,
        prior: ConversationState,
    ) -> Outcome {
        let company = intent.company.as_deref();
        let role = intent.role.as_deref();
        let target_changed = prior.company != intent.company || prior.role != intent.role;

        let sources = if prior.sources.is_empty() || target_changed {
            enter(Stage::Retrieving);
            self.refresh_sources(company, role, &prior, target_changed)
                .await
        } else {
            debug!(cached = prior.sources.len(), "Reusing cached sources");
            prior.sources
        };

        enter(Stage::Synthesizing);
        let guide = self
            .synthesis
            .synthesize(SynthesisRequest {
                company,
                role,
                timeframe: intent.timeframe.as_deref(),
                hours_until_interview: intent.hours_until_interview,
                sources: &sources,
                history,
                query,
            })
            .await;

        let target = [company, role]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Outcome {
            answer: render_markdown(&guide, &target),
            sources: guide.sources_used,
            state: ConversationState {
                company: intent.company.clone(),
                role: intent.role.clone(),
                time_to_interview: intent.timeframe.clone(),
                sources,
                last_intent: Intent::InterviewIntel,
            },
        }
    }

    /// Retrieves sources for the target. An empty result keeps the cached
    /// sources only when the target is unchanged.
    async fn refresh_sources(
        &self,
        company: Option<&str>,
        role: Option<&str>,
        prior: &ConversationState,
        target_changed: bool,
    ) -> Vec<Source> {
        let base: &[Source] = if target_changed { &[] } else { &prior.sources };
        let fallback = || {
            if target_changed {
                Vec::new()
            } else {
                prior.sources.clone()
            }
        };

        match self.retrieval.retrieve(company, role, base).await {
            Ok(found) if !found.is_empty() => found,
            Ok(_) => {
                warn!("Retrieval returned no sources");
                fallback()
            }
            Err(e) => {
                warn!("Retrieval skipped: {e}");
                fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::AwaitInput.to_string(), "AWAIT_INPUT");
        assert_eq!(Stage::Synthesizing.to_string(), "SYNTHESIZING");
    }
}
