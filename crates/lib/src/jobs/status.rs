//! StatusTracker - actor that owns the job table.
//!
//! All job-state reads and writes go through one task that owns the map, so
//! the worker and the HTTP handlers never share a lock. Handles are cheap
//! clones of the command sender.

use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{Job, JobError};

enum StatusCommand {
    Insert {
        job: Job,
        reply: oneshot::Sender<Result<(), JobError>>,
    },
    MarkProcessing {
        job_id: String,
        reply: oneshot::Sender<Result<(), JobError>>,
    },
    SetProgress {
        job_id: String,
        progress: u8,
        reply: oneshot::Sender<Result<(), JobError>>,
    },
    MarkCompleted {
        job_id: String,
        output_path: String,
        reply: oneshot::Sender<Result<(), JobError>>,
    },
    MarkFailed {
        job_id: String,
        error: String,
        reply: oneshot::Sender<Result<(), JobError>>,
    },
    Get {
        job_id: String,
        reply: oneshot::Sender<Option<Job>>,
    },
}

/// Handle to send commands to the status actor.
#[derive(Clone)]
pub struct StatusTracker {
    tx: mpsc::Sender<StatusCommand>,
}

impl StatusTracker {
    /// Spawn the actor and return a handle to it.
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(actor_loop(rx));
        Self { tx }
    }

    pub async fn insert(&self, job: Job) -> Result<(), JobError> {
        self.send(|reply| StatusCommand::Insert { job, reply }).await
    }

    pub async fn mark_processing(&self, job_id: &str) -> Result<(), JobError> {
        let job_id = job_id.to_string();
        self.send(|reply| StatusCommand::MarkProcessing { job_id, reply })
            .await
    }

    pub async fn set_progress(&self, job_id: &str, progress: u8) -> Result<(), JobError> {
        let job_id = job_id.to_string();
        self.send(|reply| StatusCommand::SetProgress {
            job_id,
            progress,
            reply,
        })
        .await
    }

    pub async fn mark_completed(&self, job_id: &str, output_path: String) -> Result<(), JobError> {
        let job_id = job_id.to_string();
        self.send(|reply| StatusCommand::MarkCompleted {
            job_id,
            output_path,
            reply,
        })
        .await
    }

    pub async fn mark_failed(&self, job_id: &str, error: String) -> Result<(), JobError> {
        let job_id = job_id.to_string();
        self.send(|reply| StatusCommand::MarkFailed {
            job_id,
            error,
            reply,
        })
        .await
    }

    /// Fetches a snapshot of a job, or `None` when the id is unknown.
    pub async fn get(&self, job_id: &str) -> Result<Option<Job>, JobError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(StatusCommand::Get {
                job_id: job_id.to_string(),
                reply,
            })
            .await
            .map_err(|_| JobError::ChannelClosed)?;
        rx.await.map_err(|_| JobError::ChannelClosed)
    }

    async fn send<F>(&self, build: F) -> Result<(), JobError>
    where
        F: FnOnce(oneshot::Sender<Result<(), JobError>>) -> StatusCommand,
    {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| JobError::ChannelClosed)?;
        rx.await.map_err(|_| JobError::ChannelClosed)?
    }
}

async fn actor_loop(mut rx: mpsc::Receiver<StatusCommand>) {
    let mut jobs: HashMap<String, Job> = HashMap::new();

    while let Some(command) = rx.recv().await {
        match command {
            StatusCommand::Insert { job, reply } => {
                debug!(job_id = %job.job_id, "job registered");
                jobs.insert(job.job_id.clone(), job);
                let _ = reply.send(Ok(()));
            }
            StatusCommand::MarkProcessing { job_id, reply } => {
                let result = update(&mut jobs, &job_id, Job::mark_processing);
                let _ = reply.send(result);
            }
            StatusCommand::SetProgress {
                job_id,
                progress,
                reply,
            } => {
                let result = update(&mut jobs, &job_id, |job| job.set_progress(progress));
                let _ = reply.send(result);
            }
            StatusCommand::MarkCompleted {
                job_id,
                output_path,
                reply,
            } => {
                let result = update(&mut jobs, &job_id, |job| job.complete(output_path));
                let _ = reply.send(result);
            }
            StatusCommand::MarkFailed {
                job_id,
                error,
                reply,
            } => {
                warn!(job_id = %job_id, error = %error, "job failed");
                let result = update(&mut jobs, &job_id, |job| job.fail(error));
                let _ = reply.send(result);
            }
            StatusCommand::Get { job_id, reply } => {
                let _ = reply.send(jobs.get(&job_id).cloned());
            }
        }
    }
    debug!("status tracker shutting down");
}

/// Applies a mutation to a live job, rejecting unknown ids and transitions
/// out of terminal states.
fn update<F>(jobs: &mut HashMap<String, Job>, job_id: &str, mutate: F) -> Result<(), JobError>
where
    F: FnOnce(&mut Job),
{
    let job = jobs
        .get_mut(job_id)
        .ok_or_else(|| JobError::NotFound(job_id.to_string()))?;
    if job.status.is_terminal() {
        return Err(JobError::Terminal(job_id.to_string()));
    }
    mutate(job);
    Ok(())
}
