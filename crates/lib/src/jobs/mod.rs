//! Job records, the status-tracking actor, and the background worker.

pub mod queue;
pub mod status;
pub mod worker;

pub use queue::{JobPayload, JobQueue};
pub use status::StatusTracker;
pub use worker::{Worker, WorkerConfig};

use crate::types::StyleConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One paraphrasing job's full externally-visible state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub document_id: String,
    pub status: JobStatus,
    /// Percentage, 0-100. Never decreases over the job's lifetime.
    pub progress: u8,
    pub config: StyleConfig,
    /// Path of the saved result. Set exactly when `status` is `Completed`.
    pub output_path: Option<String>,
    /// Human-readable failure message. Set exactly when `status` is `Failed`.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn queued(job_id: String, document_id: String, config: StyleConfig) -> Self {
        let now = Utc::now();
        Self {
            job_id,
            document_id,
            status: JobStatus::Queued,
            progress: 0,
            config,
            output_path: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub(crate) fn mark_processing(&mut self) {
        self.status = JobStatus::Processing;
        self.touch();
    }

    /// Clamps to 100 and never moves backwards.
    pub(crate) fn set_progress(&mut self, progress: u8) {
        self.progress = self.progress.max(progress.min(100));
        self.touch();
    }

    pub(crate) fn complete(&mut self, output_path: String) {
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.output_path = Some(output_path);
        self.touch();
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.status = JobStatus::Failed;
        self.error = Some(message);
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Error, Debug)]
pub enum JobError {
    #[error("Job '{0}' not found")]
    NotFound(String),
    #[error("Job '{0}' is already in a terminal state")]
    Terminal(String),
    #[error("Status tracker channel is closed")]
    ChannelClosed,
    #[error("Job queue is closed")]
    QueueClosed,
}
