use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use paraflow::{JobError, ProviderError};
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the
/// server, allowing them to be converted into appropriate HTTP responses.
pub enum AppError {
    /// The request itself is malformed or unsupported.
    BadRequest(String),
    /// The requested document or job does not exist.
    NotFound(String),
    /// Errors from the job state machine.
    Job(JobError),
    /// Errors from the AI provider layer.
    Provider(ProviderError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<JobError> for AppError {
    fn from(err: JobError) -> Self {
        AppError::Job(err)
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::Provider(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Job(err) => {
                error!("JobError: {:?}", err);
                match err {
                    JobError::NotFound(job_id) => {
                        (StatusCode::NOT_FOUND, format!("Job '{job_id}' not found"))
                    }
                    JobError::Terminal(job_id) => (
                        StatusCode::CONFLICT,
                        format!("Job '{job_id}' is already finished"),
                    ),
                    JobError::ChannelClosed | JobError::QueueClosed => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Job processing is unavailable.".to_string(),
                    ),
                }
            }
            AppError::Provider(err) => {
                error!("ProviderError: {:?}", err);
                (StatusCode::BAD_GATEWAY, format!("AI provider error: {err}"))
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
