//! Axum route handlers for resume intake.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::resume::extract::{extract_resume_text, ExtractError};
use crate::scheduler::handlers::MessageResponse;
use crate::state::AppState;

/// Multipart field carrying the resume file.
const RESUME_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct ResumeUpload {
    /// Echoed by the dashboard; the path parameter is authoritative.
    #[serde(default)]
    pub user_id: Option<String>,
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub message: String,
    pub file_name: String,
    pub characters: usize,
}

/// POST /api/scheduler/mock-save-resume/:user_id
///
/// Stores resume text sent by the dashboard.
pub async fn handle_save_resume_text(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(data): Json<ResumeUpload>,
) -> Result<Json<MessageResponse>, AppError> {
    if data.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    if let Some(body_user) = data.user_id.as_deref() {
        if body_user != user_id {
            warn!(path_user = %user_id, body_user, "Resume body user_id differs from path; using path");
        }
    }

    state.db.save_user_resume(&user_id, &data.resume_text);

    Ok(Json(MessageResponse {
        message: "Mock resume saved successfully.".to_string(),
    }))
}

/// POST /api/scheduler/resume/:user_id
///
/// Accepts a multipart upload (field `resume`), extracts its text and stores it.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let (file_name, data) = read_resume_field(&mut multipart).await?;

    let text = extract_resume_text(&file_name, &data).map_err(|e| match e {
        ExtractError::Empty => AppError::UnprocessableEntity(e.to_string()),
        other => AppError::Validation(other.to_string()),
    })?;

    state.db.save_user_resume(&user_id, &text);
    info!(user_id = %user_id, file_name = %file_name, chars = text.len(), "Resume uploaded");

    Ok(Json(ResumeUploadResponse {
        message: "Resume uploaded and processed.".to_string(),
        file_name,
        characters: text.chars().count(),
    }))
}

async fn read_resume_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(RESUME_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume.txt").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid file: {e}")))?;
        return Ok((file_name, data));
    }

    Err(AppError::Validation(format!(
        "multipart field '{RESUME_FIELD}' is required"
    )))
}
