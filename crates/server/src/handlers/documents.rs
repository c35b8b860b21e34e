//! # Document Route Handlers
//!
//! Handlers for uploading documents and starting paraphrasing jobs on them.

use crate::{errors::AppError, state::AppState};
use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use paraflow::{FileType, StyleConfig};
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub document_id: String,
    pub original_filename: String,
    pub file_type: FileType,
    pub file_path: String,
    pub size: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParaphraseResponse {
    pub job_id: String,
    pub status: &'static str,
    pub message: &'static str,
}

/// Handler for `POST /upload`.
///
/// Accepts one multipart `document` field, assigns the document an id, and
/// stores the raw bytes under `<upload_dir>/original/` as `{id}.{ext}`.
pub async fn upload_document_handler(
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut original_filename: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        if field.name() == Some("document") {
            original_filename = field.file_name().map(|name| name.to_string());
            file_data = Some(field.bytes().await.map_err(anyhow::Error::from)?.to_vec());
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;
    let original_filename = original_filename
        .ok_or_else(|| AppError::BadRequest("No file name provided".to_string()))?;

    let extension = std::path::Path::new(&original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    let file_type = FileType::from_extension(extension).ok_or_else(|| {
        AppError::BadRequest(
            "Invalid file type. Only PDF, DOCX, and TXT files are allowed.".to_string(),
        )
    })?;

    let document_id = Uuid::new_v4().to_string();
    let original_dir = PathBuf::from(&app_state.config.upload_dir).join("original");
    tokio::fs::create_dir_all(&original_dir)
        .await
        .map_err(anyhow::Error::from)?;
    let stored_path = original_dir.join(format!("{document_id}.{file_type}"));
    tokio::fs::write(&stored_path, &file_data)
        .await
        .map_err(anyhow::Error::from)?;
    info!(
        document_id = %document_id,
        original_filename = %original_filename,
        bytes = file_data.len(),
        "document uploaded"
    );

    Ok(Json(UploadResponse {
        document_id,
        original_filename,
        file_type,
        file_path: stored_path.to_string_lossy().into_owned(),
        size: file_data.len(),
    }))
}

/// Handler for `POST /paraphrase`.
///
/// The body names the uploaded document and an optional style configuration;
/// omitted style fields fall back to defaults. Returns the queued job's id.
pub async fn paraphrase_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<ParaphraseResponse>, AppError> {
    let document_id = required_string(&payload, "documentId")?;
    let file_path = required_string(&payload, "filePath")?;
    let file_type_str = required_string(&payload, "fileType")?;
    let file_type = FileType::from_extension(&file_type_str).ok_or_else(|| {
        AppError::BadRequest(format!("Unsupported file type '{file_type_str}'"))
    })?;

    let config: StyleConfig = match payload.get("config") {
        Some(value) if !value.is_null() => serde_json::from_value(value.clone())
            .map_err(|e| AppError::BadRequest(format!("Invalid config: {e}")))?,
        _ => StyleConfig::default(),
    };

    let job_id = app_state
        .queue
        .submit(document_id, PathBuf::from(file_path), file_type, config)
        .await?;

    Ok(Json(ParaphraseResponse {
        job_id,
        status: "queued",
        message: "Paraphrasing job started",
    }))
}

fn required_string(payload: &Value, field: &str) -> Result<String, AppError> {
    payload
        .get(field)
        .and_then(|value| value.as_str())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::BadRequest(
                "Missing required fields: documentId, filePath, fileType".to_string(),
            )
        })
}
