//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port. It is either backed by
//! the shared in-process mocks or built from a configuration whose backends
//! point at a `wiremock` server.

// Not every test binary uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use edgecoach::{
    prompts::PromptSet, GeneralResponder, IntentClassifier, LlmIntentStrategy, Orchestrator,
    RetrievalConfig, RetrievalEngine, SynthesisConfig, SynthesisEngine,
};
use edgecoach_server::{
    config::{get_config, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use edgecoach_test_utils::{MockAiProvider, MockFetcher, MockSearchProvider};
use reqwest::Client;
use std::{fs, net::SocketAddr, time::Duration};
use tempfile::TempDir;
use tokio::{net::TcpListener, task::JoinHandle};

/// Unique substrings of the default system prompts.
pub const INTENT_KEY: &str = "IntentJSON";
pub const SYNTHESIS_KEY: &str = "EdgeCoach AI";
pub const GENERAL_KEY: &str = "general-purpose AI assistant";

const TIMEOUT: Duration = Duration::from_secs(5);

/// The in-process mocks behind a mock-backed `TestApp`.
#[derive(Clone, Default)]
pub struct Mocks {
    pub ai: MockAiProvider,
    pub search: MockSearchProvider,
    pub fetcher: MockFetcher,
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub app_state: AppState,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server over the given mocks.
    pub async fn spawn_with_mocks(mocks: &Mocks) -> Result<Self> {
        let prompts = PromptSet::default();
        let orchestrator = Orchestrator::new(
            IntentClassifier::new(Box::new(LlmIntentStrategy::new(
                Box::new(mocks.ai.clone()),
                prompts.intent_system.clone(),
                TIMEOUT,
            ))),
            RetrievalEngine::new(
                Box::new(mocks.search.clone()),
                Box::new(mocks.fetcher.clone()),
                RetrievalConfig::default(),
            ),
            SynthesisEngine::new(
                Box::new(mocks.ai.clone()),
                prompts.synthesis_system.clone(),
                SynthesisConfig::default(),
                TIMEOUT,
            ),
            GeneralResponder::new(Box::new(mocks.ai.clone()), prompts.general_system, TIMEOUT),
        );
        let config = get_config(None)?;
        Self::spawn_with_state(AppState::new(config, orchestrator)).await
    }

    /// Writes `yaml` to a temporary `config.yml` and spawns the server built
    /// from it through `build_app_state`.
    pub async fn spawn_with_config_yaml(yaml: &str) -> Result<Self> {
        let config_dir = tempfile::tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        fs::write(&config_path, yaml)?;

        let config: AppConfig = get_config(Some(
            config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("non-UTF-8 temp path"))?,
        ))?;
        let app_state = build_app_state(config).await?;
        let mut app = Self::spawn_with_state(app_state).await?;
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    pub async fn spawn_with_state(app_state: AppState) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .with_test_writer()
            .try_init();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let router_state = app_state.clone();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(router_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            app_state,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
