//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds all shared resources, such
//! as the configuration, the job queue handle, and the status tracker, making
//! them accessible to all request handlers.

use crate::config::AppConfig;
use paraflow::{
    providers::ai::openrouter::OpenRouterProvider, AiProvider, EngineConfig, JobQueue,
    ParaphraseEngine, StatusTracker, Worker, WorkerConfig,
};
use std::{path::PathBuf, sync::Arc, time::Duration};

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// Handle for submitting paraphrasing jobs to the worker.
    pub queue: JobQueue,
    /// Handle for querying and recording job state.
    pub tracker: StatusTracker,
}

/// Builds the shared application state from the configuration.
///
/// This instantiates the AI provider, the paraphrasing engine, the status
/// actor, and the background worker that drains the job queue.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let provider: Box<dyn AiProvider> = match config.provider.provider.as_str() {
        "openrouter" => {
            let api_key = config.provider.api_key.clone().ok_or_else(|| {
                anyhow::anyhow!(
                    "api_key is required for the openrouter provider. Please set OPENROUTER_API_KEY in your .env file."
                )
            })?;
            Box::new(OpenRouterProvider::new(
                config.provider.api_url.clone(),
                api_key,
                config.provider.model_name.clone(),
            )?)
        }
        other => {
            return Err(anyhow::anyhow!("Unsupported AI provider type '{other}'"));
        }
    };

    let engine = ParaphraseEngine::new(
        provider,
        EngineConfig {
            max_chunk_size: config.engine.max_chunk_size,
            overlap_size: config.engine.overlap_size,
            pacing_interval: Duration::from_millis(config.engine.pacing_interval_ms),
        },
    );

    let tracker = StatusTracker::spawn();
    let (queue, _worker_handle) = Worker::spawn(
        engine,
        tracker.clone(),
        WorkerConfig {
            output_dir: PathBuf::from(&config.output_dir),
            max_attempts: config.worker.max_attempts,
            retry_backoff: Duration::from_millis(config.worker.retry_backoff_ms),
        },
    );

    tokio::fs::create_dir_all(&config.upload_dir).await?;
    tracing::info!(upload_dir = %config.upload_dir, "Initialized upload directory.");

    Ok(AppState {
        config: Arc::new(config),
        queue,
        tracker,
    })
}
