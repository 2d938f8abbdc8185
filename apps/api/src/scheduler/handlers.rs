//! Axum route handlers for the Scheduler & Tracking API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::application::ApplicationList;
use crate::models::user::User;
use crate::scheduler::checker::spawn_check;
use crate::scheduler::fixtures::demo_applications;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/scheduler/start-check
///
/// Kicks off a background inbox check for the user and returns immediately.
pub async fn handle_start_check(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> Result<Json<MessageResponse>, AppError> {
    if user.id.trim().is_empty() {
        return Err(AppError::Validation("user id cannot be empty".to_string()));
    }

    info!(user_id = %user.id, "Background inbox check requested");
    // Detached: the outcome is only logged.
    let _ = spawn_check(state.db.clone(), state.config.checker.clone(), user.id);

    Ok(Json(MessageResponse {
        message: "Background Gmail check initiated.".to_string(),
    }))
}

/// GET /api/scheduler/applications/:user_id
///
/// Lists the user's applications by interview date. A user with none gets
/// the three demo applications seeded first.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApplicationList>, AppError> {
    let seeded = state
        .db
        .seed_applications_if_empty(&user_id, || demo_applications(&user_id, Utc::now()));
    if seeded {
        info!(user_id = %user_id, "Seeded demo applications");
    }

    Ok(Json(ApplicationList {
        applications: state.db.get_applications(&user_id),
    }))
}
