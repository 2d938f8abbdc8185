//! Axum route handlers for the Authentication API.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

/// User id the dashboard uses before anyone has signed in.
pub const MOCK_USER_ID: &str = "MOCK_USER_ID";

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CallbackResponse {
    pub message: String,
    pub user_id: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    MOCK_USER_ID.to_string()
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub authenticated: bool,
    pub message: String,
}

/// GET /auth/google/login
///
/// Starts the Google OAuth flow: remembers a fresh `state` and redirects.
pub async fn handle_login(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let oauth_state = state.pending_states.issue();
    let url = state
        .oauth
        .authorization_url(&oauth_state)
        .map_err(|e| AppError::Internal(e.into()))?;
    info!("Redirecting to Google for authorization");
    Ok(Redirect::temporary(&url))
}

/// GET /auth/google/callback
///
/// Completes the flow: checks `state`, exchanges the code, saves the refresh
/// token and profile, then either bounces to the dashboard or returns JSON.
pub async fn handle_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let state_ok = query
        .state
        .as_deref()
        .is_some_and(|s| state.pending_states.consume(s));
    if !state_ok {
        warn!("OAuth callback with unknown or expired state");
        return Err(AppError::StateMismatch);
    }

    if let Some(error) = query.error {
        return Err(AppError::Validation(format!(
            "Google denied authorization: {error}"
        )));
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("Missing authorization code".to_string()))?;

    let identity = state
        .oauth
        .exchange_code(&code)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    state.db.save_user_profile(
        &identity.user_id,
        identity.email.as_deref(),
        identity.name.as_deref(),
    );
    match identity.refresh_token.as_deref() {
        Some(token) => state.db.save_user_token(&identity.user_id, token),
        None => warn!(
            user_id = %identity.user_id,
            "Google returned no refresh token; offline checks stay disabled"
        ),
    }
    info!(user_id = %identity.user_id, "Authentication successful");

    if let Some(frontend) = state.config.frontend_url.as_deref() {
        let display_name = identity.name.as_deref().unwrap_or("Authenticated User");
        let url = Url::parse_with_params(
            frontend,
            &[
                ("auth_success", "true"),
                ("user_id", identity.user_id.as_str()),
                ("user_name", display_name),
            ],
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid FRONTEND_URL: {e}")))?;
        return Ok(Redirect::temporary(url.as_str()).into_response());
    }

    Ok(Json(CallbackResponse {
        message: "Authentication successful!".to_string(),
        user_id: identity.user_id,
        name: identity.name,
    })
    .into_response())
}

/// GET /auth/user/status
///
/// Reports whether a refresh token is stored for the user.
pub async fn handle_user_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Json<StatusResponse> {
    let response = if state.db.get_user_token(&query.user_id).is_some() {
        StatusResponse {
            authenticated: true,
            message: "User token active.".to_string(),
        }
    } else {
        StatusResponse {
            authenticated: false,
            message: "User needs to authenticate via OAuth.".to_string(),
        }
    };
    Json(response)
}
