//! # Application State
//!
//! Defines the shared application state (`AppState`) and the logic for building
//! it at startup: one generative backend client per configured model, the
//! search and fetch providers, and the orchestrator composed from them.

use crate::config::AppConfig;
use edgecoach::{
    providers::{
        ai::{
            gemini::{GeminiProvider, GEMINI_URL_TEMPLATE},
            local::LocalAiProvider,
            AiProvider,
        },
        search::TavilyProvider,
    },
    GeneralResponder, IntentClassifier, LlmIntentStrategy, Orchestrator, RetrievalEngine,
    SynthesisEngine,
};
use edgecoach_web::WebFetcher;
use std::{sync::Arc, time::Duration};
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Wraps an already composed orchestrator.
    pub fn new(config: AppConfig, orchestrator: Orchestrator) -> Self {
        Self {
            config: Arc::new(config),
            orchestrator: Arc::new(orchestrator),
        }
    }
}

/// Instantiates the generative backend client for one model.
pub fn build_ai_provider(config: &AppConfig, model: &str) -> anyhow::Result<Box<dyn AiProvider>> {
    let provider: Box<dyn AiProvider> = match config.ai_provider.as_str() {
        "gemini" => {
            let api_key = config
                .ai_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("AI_API_KEY is required for the gemini provider"))?;
            let api_url = config
                .ai_api_url
                .as_deref()
                .unwrap_or(GEMINI_URL_TEMPLATE)
                .replace("{model}", model);
            Box::new(GeminiProvider::new(api_url, api_key)?)
        }
        "local" => {
            let api_url = config.ai_api_url.clone().ok_or_else(|| {
                anyhow::anyhow!("AI_API_URL is required for the local provider")
            })?;
            Box::new(LocalAiProvider::new(
                api_url,
                config.ai_api_key.clone(),
                Some(model.to_string()),
            )?)
        }
        other => {
            return Err(anyhow::anyhow!("Unsupported AI provider: {other}"));
        }
    };
    Ok(provider)
}

/// Builds the shared application state from the configuration.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let generation_timeout = Duration::from_secs(config.generation_timeout_secs);
    let fetch_timeout = Duration::from_secs(config.retrieval.fetch_timeout_secs);

    let classifier = IntentClassifier::new(Box::new(LlmIntentStrategy::new(
        build_ai_provider(&config, &config.intent_model)?,
        config.prompts.intent_system.clone(),
        generation_timeout,
    )));

    if config.tavily_api_key.is_none() {
        info!("TAVILY_API_KEY is not set; interview intel will be answered without sources.");
    }
    let search = TavilyProvider::new(
        config.tavily_api_url.clone(),
        config.tavily_api_key.clone(),
        fetch_timeout,
    )?;
    let retrieval = RetrievalEngine::new(
        Box::new(search),
        Box::new(WebFetcher::new(fetch_timeout)?),
        config.retrieval.clone(),
    );

    let synthesis = SynthesisEngine::new(
        build_ai_provider(&config, &config.synthesis_model)?,
        config.prompts.synthesis_system.clone(),
        config.synthesis.clone(),
        generation_timeout,
    );

    let general = GeneralResponder::new(
        build_ai_provider(&config, &config.general_model)?,
        config.prompts.general_system.clone(),
        generation_timeout,
    );

    info!(
        provider = %config.ai_provider,
        intent_model = %config.intent_model,
        synthesis_model = %config.synthesis_model,
        general_model = %config.general_model,
        "Initialized backend providers."
    );

    let orchestrator = Orchestrator::new(classifier, retrieval, synthesis, general);
    Ok(AppState::new(config, orchestrator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: serde_json::Value) -> AppConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_gemini_defaults_to_public_endpoint_per_model() {
        let provider =
            build_ai_provider(&config(json!({ "ai_api_key": "k" })), "gemini-2.0-flash").unwrap();
        let debug = format!("{provider:?}");
        assert!(debug.contains("/models/gemini-2.0-flash:generateContent"));
    }

    #[test]
    fn test_provider_requirements() {
        assert!(build_ai_provider(&config(json!({})), "m").is_err());
        assert!(build_ai_provider(&config(json!({ "ai_provider": "local" })), "m").is_err());
        assert!(build_ai_provider(&config(json!({ "ai_provider": "other" })), "m").is_err());
    }
}
