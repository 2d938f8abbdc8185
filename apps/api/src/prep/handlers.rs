//! Axum route handlers for the AI preparation API.

use axum::{extract::State, Json};
use tracing::info;

use crate::errors::AppError;
use crate::models::prep::{
    AiPrepRequest, PracticeChatRequest, PracticeChatResponse, PrepTipsResponse,
};
use crate::prep::chat::{ChatTurn, GUEST_NAME};
use crate::state::AppState;

/// POST /api/ai/prep
///
/// Compares the user's stored resume with the JD of `app_id` and returns
/// structured prep tips. The application is looked up by id alone.
pub async fn handle_generate_prep_tips(
    State(state): State<AppState>,
    Json(request): Json<AiPrepRequest>,
) -> Result<Json<PrepTipsResponse>, AppError> {
    let resume_text = state.db.get_user_resume(&request.user_id).ok_or_else(|| {
        AppError::NotFound(
            "User resume not found. Please upload it via the dashboard.".to_string(),
        )
    })?;

    let application = state.db.get_application(&request.app_id).ok_or_else(|| {
        AppError::NotFound(format!(
            "Application data not found for ID: {}.",
            request.app_id
        ))
    })?;

    let tips = state
        .analyzer
        .analyze(&application.jd_text, &resume_text)
        .await?;

    info!(
        app_id = %request.app_id,
        user_id = %request.user_id,
        backend = state.analyzer.backend(),
        confidence = tips.match_confidence,
        "Prep tips generated"
    );

    Ok(Json(tips))
}

/// POST /api/ai/chat
///
/// One turn of the canned mock interview. `app_id`, when given, must name a
/// stored application.
pub async fn handle_practice_chat(
    State(state): State<AppState>,
    Json(request): Json<PracticeChatRequest>,
) -> Result<Json<PracticeChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("Chat message must not be empty".to_string()));
    }

    if let Some(app_id) = request.app_id.as_deref() {
        if state.db.get_application(app_id).is_none() {
            return Err(AppError::NotFound(format!(
                "Application data not found for ID: {app_id}."
            )));
        }
    }

    let name = state
        .db
        .get_user_name(&request.user_id)
        .unwrap_or_else(|| GUEST_NAME.to_string());
    let turn = ChatTurn::classify(&request.message);

    info!(
        user_id = %request.user_id,
        app_id = request.app_id.as_deref().unwrap_or("-"),
        turn = ?turn,
        "Practice chat reply"
    );

    Ok(Json(PracticeChatResponse {
        reply: turn.reply(&name),
    }))
}
