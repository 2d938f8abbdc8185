//! Calendar event stub. Builds the event a real Google Calendar integration
//! would insert for a newly detected interview; nothing is sent anywhere.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::application::Application;

/// Minutes-before-start for each popup reminder: 24 h and 1 h.
pub const REMINDER_MINUTES: [i64; 2] = [24 * 60, 60];
const INTERVIEW_LENGTH_MINUTES: i64 = 60;

#[derive(Debug, Clone, Serialize)]
pub struct CalendarEvent {
    pub summary: String,
    pub description: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reminders: Vec<Reminder>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    pub minutes_before: i64,
    pub fires_at: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn for_application(app: &Application) -> Self {
        Self {
            summary: format!("Interview: {} at {}", app.role, app.company),
            description: format!("Tracked application {}", app.app_id),
            start: app.date,
            end: app.date + Duration::minutes(INTERVIEW_LENGTH_MINUTES),
            reminders: REMINDER_MINUTES
                .iter()
                .map(|&minutes| Reminder {
                    minutes_before: minutes,
                    fires_at: app.date - Duration::minutes(minutes),
                })
                .collect(),
        }
    }
}
