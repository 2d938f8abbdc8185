use serde::{Deserialize, Serialize};

/// A user as held in the mock store. Fields fill in as the user logs in,
/// uploads a resume, or is referenced by another operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub refresh_token: Option<String>,
    pub resume_text: Option<String>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Authenticated user payload posted by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique ID for the user (Google ID).
    pub id: String,
    pub email: String,
    pub name: String,
}
