//! The background worker that drains the queue and runs jobs to completion.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use futures::FutureExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{queue::JobPayload, JobError, JobQueue, StatusTracker};
use crate::{
    engine::{EngineError, ParaphraseEngine},
    extract::{extract_text, ExtractError},
};

/// Progress checkpoint after text extraction succeeds.
const EXTRACTION_PROGRESS: u8 = 10;
/// Progress checkpoint once the rewrite phase begins.
const TRANSFORM_START_PROGRESS: u8 = 20;

/// Maps per-chunk completion onto the 20-90 band of the progress scale; the
/// band above 90 is reserved for saving the output.
fn chunk_progress(completed: usize, total: usize) -> u8 {
    let fraction = completed as f64 / total as f64;
    TRANSFORM_START_PROGRESS + (70.0 * fraction).round() as u8
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Directory where finished documents are written.
    pub output_dir: PathBuf,
    /// Total attempts per job, including the first.
    pub max_attempts: u32,
    /// Backoff before the first retry; doubles for each retry after that.
    pub retry_backoff: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("uploads/processed"),
            max_attempts: 3,
            retry_backoff: Duration::from_millis(5000),
        }
    }
}

#[derive(Error, Debug)]
enum JobRunError {
    #[error(transparent)]
    Status(#[from] JobError),
    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Failed to write output document: {0}")]
    Persist(io::Error),
}

/// Owns the queue receiver and processes jobs strictly one at a time.
pub struct Worker;

impl Worker {
    /// Spawns the worker task and returns the queue handle for submissions.
    pub fn spawn(
        engine: ParaphraseEngine,
        tracker: StatusTracker,
        config: WorkerConfig,
    ) -> (JobQueue, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(64);
        let queue = JobQueue::new(tx, tracker.clone());
        let handle = tokio::spawn(run(engine, tracker, config, rx));
        (queue, handle)
    }
}

async fn run(
    engine: ParaphraseEngine,
    tracker: StatusTracker,
    config: WorkerConfig,
    mut rx: mpsc::Receiver<JobPayload>,
) {
    info!(output_dir = %config.output_dir.display(), "worker started");
    while let Some(payload) = rx.recv().await {
        handle_delivery(&engine, &tracker, &config, payload).await;
    }
    info!("worker shutting down, queue closed");
}

/// Runs one job with retries. Each attempt re-runs the whole pipeline from
/// extraction; the job is only marked failed after the final attempt.
async fn handle_delivery(
    engine: &ParaphraseEngine,
    tracker: &StatusTracker,
    config: &WorkerConfig,
    payload: JobPayload,
) {
    for attempt in 1..=config.max_attempts {
        match process_job(engine, tracker, config, &payload).await {
            Ok(()) => {
                info!(job_id = %payload.job_id, attempt, "job completed");
                return;
            }
            Err(err) if attempt < config.max_attempts => {
                let backoff = config.retry_backoff * 2u32.pow(attempt - 1);
                warn!(
                    job_id = %payload.job_id,
                    attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "job attempt failed, retrying"
                );
                tokio::time::sleep(backoff).await;
            }
            Err(err) => {
                error!(job_id = %payload.job_id, attempt, error = %err, "job failed permanently");
                if let Err(status_err) =
                    tracker.mark_failed(&payload.job_id, err.to_string()).await
                {
                    error!(job_id = %payload.job_id, error = %status_err, "could not record job failure");
                }
            }
        }
    }
}

async fn process_job(
    engine: &ParaphraseEngine,
    tracker: &StatusTracker,
    config: &WorkerConfig,
    payload: &JobPayload,
) -> Result<(), JobRunError> {
    tracker.mark_processing(&payload.job_id).await?;

    let document = extract_text(&payload.file_path, payload.file_type).await?;
    tracker
        .set_progress(&payload.job_id, EXTRACTION_PROGRESS)
        .await?;
    tracker
        .set_progress(&payload.job_id, TRANSFORM_START_PROGRESS)
        .await?;

    let progress_tracker = tracker.clone();
    let progress_job_id = payload.job_id.clone();
    let output = engine
        .paraphrase_document(&document.text, &payload.config, move |completed, total| {
            let tracker = progress_tracker.clone();
            let job_id = progress_job_id.clone();
            async move {
                if let Err(err) = tracker
                    .set_progress(&job_id, chunk_progress(completed, total))
                    .await
                {
                    warn!(job_id = %job_id, error = %err, "progress update dropped");
                }
            }
            .boxed()
        })
        .await?;

    let output_path = save_output(config, payload, &output)
        .await
        .map_err(JobRunError::Persist)?;
    tracker
        .mark_completed(&payload.job_id, output_path.clone())
        .await?;
    Ok(())
}

async fn save_output(
    config: &WorkerConfig,
    payload: &JobPayload,
    text: &str,
) -> Result<String, io::Error> {
    tokio::fs::create_dir_all(&config.output_dir).await?;
    let file_name = format!(
        "{}_paraphrased.{}",
        payload.document_id,
        payload.file_type.as_str()
    );
    let path = config.output_dir.join(file_name);
    tokio::fs::write(&path, text).await?;
    Ok(path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_progress_spans_the_transform_band() {
        assert_eq!(chunk_progress(1, 10), 27);
        assert_eq!(chunk_progress(5, 10), 55);
        assert_eq!(chunk_progress(10, 10), 90);
        assert_eq!(chunk_progress(1, 1), 90);
    }
}
