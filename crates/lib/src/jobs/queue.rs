//! Submission side of the in-process job queue.

use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use super::{Job, JobError, StatusTracker};
use crate::{extract::FileType, types::StyleConfig};

/// Everything the worker needs to run one job.
#[derive(Debug, Clone)]
pub struct JobPayload {
    pub job_id: String,
    pub document_id: String,
    pub file_path: PathBuf,
    pub file_type: FileType,
    pub config: StyleConfig,
}

/// Handle for enqueuing jobs. Registers the job with the status tracker
/// before handing it to the worker, so a submitted job is always queryable.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<JobPayload>,
    tracker: StatusTracker,
}

impl JobQueue {
    pub(crate) fn new(tx: mpsc::Sender<JobPayload>, tracker: StatusTracker) -> Self {
        Self { tx, tracker }
    }

    /// Enqueues a paraphrasing job and returns its generated id.
    pub async fn submit(
        &self,
        document_id: String,
        file_path: PathBuf,
        file_type: FileType,
        config: StyleConfig,
    ) -> Result<String, JobError> {
        let job_id = Uuid::new_v4().to_string();

        self.tracker
            .insert(Job::queued(
                job_id.clone(),
                document_id.clone(),
                config.clone(),
            ))
            .await?;

        let payload = JobPayload {
            job_id: job_id.clone(),
            document_id,
            file_path,
            file_type,
            config,
        };
        self.tx
            .send(payload)
            .await
            .map_err(|_| JobError::QueueClosed)?;

        info!(job_id = %job_id, "job enqueued");
        Ok(job_id)
    }
}
