//! # Application Configuration
//!
//! This module defines the configuration structure for the `paraflow-server`
//! and provides the logic for loading it from a `config.yml` file and
//! environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
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

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory where uploaded documents are stored.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    /// Directory where paraphrased documents are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// The AI provider used for rewriting.
    pub provider: ProviderConfig,
    /// Pipeline tuning knobs.
    #[serde(default)]
    pub engine: EngineSettings,
    /// Worker retry behavior.
    #[serde(default)]
    pub worker: WorkerSettings,
}

fn default_port() -> u16 {
    3000
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_output_dir() -> String {
    "uploads/processed".to_string()
}

/// Configuration for the AI provider used to rewrite chunks.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// The type of provider. Currently only "openrouter" is supported.
    pub provider: String,
    /// The API URL. Optional; defaults to the real OpenRouter endpoint.
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    /// Default model; individual jobs may override it.
    pub model_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EngineSettings {
    pub max_chunk_size: usize,
    pub overlap_size: usize,
    pub pacing_interval_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_chunk_size: 4000,
            overlap_size: 200,
            pacing_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WorkerSettings {
    pub max_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_backoff_ms: 5000,
        }
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").unwrap();
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// The file is read from `config.yml` next to the crate manifest unless
/// `config_path_override` is given. `${VAR}` placeholders in the YAML are
/// substituted from the environment before parsing.
/// - Top-level keys like `port` are overridden by `PORT`.
/// - Nested keys are overridden by `PARAFLOW_...` variables
///   (e.g., `PARAFLOW_PROVIDER__API_KEY`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let main_config_path = if let Some(override_path) = config_path_override {
        override_path.to_string()
    } else {
        let base_path = env!("CARGO_MANIFEST_DIR");
        format!("{base_path}/config.yml")
    };

    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'. Please create a 'config.yml'."
        ))
    })?;
    info!("Loading configuration from '{main_config_path}'.");

    let settings = ConfigBuilder::builder()
        .add_source(File::from_str(&main_content, FileFormat::Yaml))
        // Environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("PARAFLOW")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // After all layers, explicitly check for the provider key from the
    // environment if it hasn't been set by file substitution.
    if config.provider.api_key.is_none() {
        if let Ok(key) = env::var("OPENROUTER_API_KEY") {
            if !key.is_empty() {
                config.provider.api_key = Some(key);
            }
        }
    }

    Ok(config)
}
