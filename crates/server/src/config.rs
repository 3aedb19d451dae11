//! # Application Configuration
//!
//! Defines the configuration of the `edgecoach-server` and loads it from
//! programmatic defaults, an optional `config.yml` and environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use edgecoach::{
    providers::search::tavily::DEFAULT_TAVILY_URL, PromptSet, RetrievalConfig, SynthesisConfig,
};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::LazyLock;
use tracing::info;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("valid regex"));

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Loaded from the `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The generative backend type, `gemini` or `local`. Loaded from `AI_PROVIDER`.
    #[serde(default = "default_ai_provider")]
    pub ai_provider: String,
    /// Endpoint of the generative backend. For Gemini, a `{model}` placeholder
    /// is replaced by each model name; when unset the public endpoint is used.
    #[serde(default)]
    pub ai_api_url: Option<String>,
    #[serde(default)]
    pub ai_api_key: Option<String>,
    #[serde(default = "default_model")]
    pub intent_model: String,
    #[serde(default = "default_model")]
    pub synthesis_model: String,
    #[serde(default = "default_model")]
    pub general_model: String,
    #[serde(default)]
    pub tavily_api_key: Option<String>,
    #[serde(default = "default_tavily_url")]
    pub tavily_api_url: String,
    /// Bound on each generation call, in seconds.
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,

    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    /// System prompt overrides for the three backend calls.
    #[serde(default)]
    pub prompts: PromptSet,
}

fn default_port() -> u16 {
    9090
}

fn default_ai_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_tavily_url() -> String {
    DEFAULT_TAVILY_URL.to_string()
}

fn default_generation_timeout() -> u64 {
    30
}

// Reads a file and substitutes `${VAR}` references with environment values.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded_content = ENV_VAR_RE.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration.
///
/// Layers, lowest precedence first:
/// - defaults declared on [`AppConfig`],
/// - `config.yml` next to the server manifest, or `config_path_override`,
/// - flat environment variables such as `PORT` or `TAVILY_API_KEY`,
/// - `EDGECOACH_` prefixed nested overrides such as
///   `EDGECOACH_RETRIEVAL__MAX_SOURCES`.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let file_content = match config_path_override {
        Some(path) => Some(read_and_substitute(path)?.ok_or_else(|| {
            ConfigError::NotFound(format!("Config file not found at '{path}'."))
        })?),
        None => {
            let default_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            let content = read_and_substitute(&default_path)?;
            if content.is_some() {
                info!("Loading configuration from '{default_path}'.");
            }
            content
        }
    };
    if let Some(content) = file_content {
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("EDGECOACH")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // Blank values left behind by `${VAR}` substitution mean "unset".
    for key in [&mut config.ai_api_key, &mut config.ai_api_url, &mut config.tavily_api_key] {
        if key.as_deref().is_some_and(|v| v.trim().is_empty()) {
            *key = None;
        }
    }

    Ok(config)
}
