//! # Job Route Handlers
//!
//! Handlers for polling job status and downloading finished documents.

use crate::{errors::AppError, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use paraflow::{FileType, Job, JobStatus};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub updated_at: String,
}

impl From<Job> for JobStatusResponse {
    fn from(job: Job) -> Self {
        Self {
            job_id: job.job_id,
            status: job.status,
            progress: job.progress,
            output_path: job.output_path,
            error: job.error,
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct DownloadParams {
    pub file_type: Option<String>,
}

/// Handler for `GET /jobs/{job_id}`.
pub async fn job_status_handler(
    State(app_state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<JobStatusResponse>, AppError> {
    let job = app_state
        .tracker
        .get(&job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    Ok(Json(job.into()))
}

/// Handler for `GET /download/{document_id}`.
///
/// Serves `{document_id}_paraphrased.{file_type}` from the output directory;
/// `file_type` defaults to `txt`.
pub async fn download_handler(
    State(app_state): State<AppState>,
    Path(document_id): Path<String>,
    Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse, AppError> {
    let file_type_str = params.file_type.unwrap_or_else(|| "txt".to_string());
    let file_type = FileType::from_extension(&file_type_str).ok_or_else(|| {
        AppError::BadRequest(format!("Unsupported file type '{file_type_str}'"))
    })?;

    let file_name = format!("{document_id}_paraphrased.{file_type}");
    let file_path = PathBuf::from(&app_state.config.output_dir).join(&file_name);

    let body = tokio::fs::read(&file_path)
        .await
        .map_err(|_| AppError::NotFound("Processed document not found".to_string()))?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, body))
}
