#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Builds engines and a full orchestrator over the shared mocks so each test
//! only programs the responses it cares about.

use edgecoach::{
    prompts::PromptSet, GeneralResponder, IntentClassifier, LlmIntentStrategy, Orchestrator,
    RetrievalConfig, RetrievalEngine, SynthesisConfig, SynthesisEngine,
};
use edgecoach_test_utils::{MockAiProvider, MockFetcher, MockSearchProvider};
use std::sync::Once;
use std::time::Duration;

/// Unique substrings of the default system prompts, used as mock keys.
pub const INTENT_KEY: &str = "IntentJSON";
pub const SYNTHESIS_KEY: &str = "EdgeCoach AI";
pub const GENERAL_KEY: &str = "general-purpose AI assistant";

pub const TIMEOUT: Duration = Duration::from_secs(5);

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn classifier(ai: &MockAiProvider) -> IntentClassifier {
    IntentClassifier::new(Box::new(LlmIntentStrategy::new(
        Box::new(ai.clone()),
        PromptSet::default().intent_system,
        TIMEOUT,
    )))
}

pub fn retrieval(
    search: &MockSearchProvider,
    fetcher: &MockFetcher,
    config: RetrievalConfig,
) -> RetrievalEngine {
    RetrievalEngine::new(Box::new(search.clone()), Box::new(fetcher.clone()), config)
}

pub fn synthesis(ai: &MockAiProvider) -> SynthesisEngine {
    SynthesisEngine::new(
        Box::new(ai.clone()),
        PromptSet::default().synthesis_system,
        SynthesisConfig::default(),
        TIMEOUT,
    )
}

/// The mocks behind an orchestrator, kept for programming and assertions.
pub struct Harness {
    pub ai: MockAiProvider,
    pub search: MockSearchProvider,
    pub fetcher: MockFetcher,
    pub orchestrator: Orchestrator,
}

pub fn harness_with(search: MockSearchProvider) -> Harness {
    setup_tracing();
    let ai = MockAiProvider::new();
    let fetcher = MockFetcher::new();
    let orchestrator = Orchestrator::new(
        classifier(&ai),
        retrieval(&search, &fetcher, RetrievalConfig::default()),
        synthesis(&ai),
        GeneralResponder::new(
            Box::new(ai.clone()),
            PromptSet::default().general_system,
            TIMEOUT,
        ),
    );
    Harness {
        ai,
        search,
        fetcher,
        orchestrator,
    }
}

pub fn harness() -> Harness {
    harness_with(MockSearchProvider::new())
}
