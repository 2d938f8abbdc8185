use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATUS_UPCOMING: &str = "Upcoming";

/// A single tracked job application / interview event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub app_id: String,
    pub user_id: String,
    pub company: String,
    pub role: String,
    /// Full text of the job description.
    pub jd_text: String,
    /// Scheduled interview time.
    pub date: DateTime<Utc>,
    pub status: String,
}

/// Fields needed to insert an application; the store assigns id and status.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: String,
    pub company: String,
    pub role: String,
    pub jd_text: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplicationList {
    pub applications: Vec<Application>,
}
