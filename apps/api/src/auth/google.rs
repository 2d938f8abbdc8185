//! Google OAuth 2.0 authorization-code flow.
//!
//! `AppState` holds an `Arc<dyn OAuthProvider>` so handlers can be exercised
//! without reaching Google.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::GoogleOAuthConfig;

const AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URI: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

pub const SCOPES: [&str; 5] = [
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/calendar.events",
    "openid",
    "email",
    "profile",
];

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Google API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// The identity established by a completed OAuth exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct OAuthIdentity {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Only present when Google grants offline access.
    pub refresh_token: Option<String>,
}

#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// URL the browser is sent to, carrying `state` for CSRF protection.
    fn authorization_url(&self, state: &str) -> Result<String, OAuthError>;

    /// Trades an authorization code for tokens and resolves the user profile.
    async fn exchange_code(&self, code: &str) -> Result<OAuthIdentity, OAuthError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
    email: Option<String>,
    name: Option<String>,
}

#[derive(Clone)]
pub struct GoogleOAuth {
    client: Client,
    config: GoogleOAuthConfig,
}

impl GoogleOAuth {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, OAuthError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            config,
        })
    }
}

#[async_trait]
impl OAuthProvider for GoogleOAuth {
    fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
        build_authorization_url(&self.config, state)
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthIdentity, OAuthError> {
        let response = self
            .client
            .post(TOKEN_URI)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;
        let tokens: TokenResponse = read_json(response).await?;
        debug!(
            expires_in = ?tokens.expires_in,
            offline = tokens.refresh_token.is_some(),
            "Google token exchange succeeded"
        );

        let response = self
            .client
            .get(USERINFO_URI)
            .bearer_auth(&tokens.access_token)
            .send()
            .await?;
        let user: UserInfo = read_json(response).await?;

        Ok(OAuthIdentity {
            user_id: user.id,
            email: user.email,
            name: user.name,
            refresh_token: tokens.refresh_token,
        })
    }
}

pub fn build_authorization_url(config: &GoogleOAuthConfig, state: &str) -> Result<String, OAuthError> {
    let scope = SCOPES.join(" ");
    let url = Url::parse_with_params(
        AUTH_URI,
        &[
            ("response_type", "code"),
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state),
            ("access_type", "offline"),
            ("include_granted_scopes", "true"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| OAuthError::InvalidUrl(e.to_string()))?;
    Ok(url.into())
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, OAuthError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(OAuthError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}
