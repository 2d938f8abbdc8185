//! Simulated inbox checker.
//!
//! Stands in for "read Gmail, parse interview invites, create calendar
//! events". A check needs a stored refresh token, waits out a fake API
//! latency, then flips a weighted coin. On a hit it stores a randomly drawn
//! application and builds the calendar event for it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::seq::IndexedRandom;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::CheckerConfig;
use crate::db::MockDb;
use crate::models::application::{Application, NewApplication};
use crate::scheduler::calendar::CalendarEvent;
use crate::scheduler::fixtures::{CHECKER_COMPANIES, CHECKER_ROLES, MOCK_JDS};

/// Result of a single inbox check.
#[derive(Debug)]
pub enum CheckOutcome {
    SkippedNoToken,
    NoNewInterviews,
    Scheduled {
        application: Application,
        event: CalendarEvent,
    },
}

pub async fn check_inbox_and_schedule(
    db: &MockDb,
    config: &CheckerConfig,
    user_id: &str,
) -> CheckOutcome {
    if db.get_user_token(user_id).is_none() {
        warn!(user_id, "Checker: token not found, skipping check");
        return CheckOutcome::SkippedNoToken;
    }

    info!(user_id, "Checker: starting Gmail check");
    tokio::time::sleep(Duration::from_millis(config.latency_ms)).await;

    let Some(new_app) = draw_interview(user_id, config.hit_rate) else {
        info!(user_id, "Checker: no new interview emails found");
        return CheckOutcome::NoNewInterviews;
    };

    let application = db.add_application(new_app);
    let event = CalendarEvent::for_application(&application);
    info!(
        user_id,
        app_id = %application.app_id,
        company = %application.company,
        start = %event.start,
        reminders = event.reminders.len(),
        "Checker: new interview found and scheduled"
    );

    CheckOutcome::Scheduled { application, event }
}

/// Runs one check on the runtime without blocking the caller.
pub fn spawn_check(
    db: Arc<MockDb>,
    config: CheckerConfig,
    user_id: String,
) -> JoinHandle<CheckOutcome> {
    tokio::spawn(async move { check_inbox_and_schedule(&db, &config, &user_id).await })
}

/// Starts the periodic sweep over every user with a refresh token.
/// Returns `None` when `interval_secs` is 0.
pub fn spawn_periodic_checker(db: Arc<MockDb>, config: CheckerConfig) -> Option<JoinHandle<()>> {
    if config.interval_secs == 0 {
        return None;
    }

    info!(
        interval_secs = config.interval_secs,
        "Starting periodic inbox checker"
    );

    Some(tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(config.interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first sweep
        // happens one interval after startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let users = db.users_with_tokens();
            if users.is_empty() {
                continue;
            }
            let checked = users.len();
            let mut scheduled = 0;
            for user_id in users {
                if let CheckOutcome::Scheduled { application, event } =
                    check_inbox_and_schedule(&db, &config, &user_id).await
                {
                    debug!(app_id = %application.app_id, summary = %event.summary, "Sweep scheduled interview");
                    scheduled += 1;
                }
            }
            info!(checked, scheduled, "Periodic inbox sweep finished");
        }
    }))
}

/// Weighted coin flip; on a hit, draws a random company, role, JD and an
/// interview date 3 to 10 days out.
fn draw_interview(user_id: &str, hit_rate: f64) -> Option<NewApplication> {
    let mut rng = rand::rng();
    if !rng.random_bool(hit_rate.clamp(0.0, 1.0)) {
        return None;
    }

    let company = CHECKER_COMPANIES.choose(&mut rng)?;
    let role = CHECKER_ROLES.choose(&mut rng)?;
    let (_, jd_text) = MOCK_JDS.choose(&mut rng)?;
    let days_out = rng.random_range(3..=10);

    Some(NewApplication {
        user_id: user_id.to_string(),
        company: company.to_string(),
        role: role.to_string(),
        jd_text: jd_text.to_string(),
        date: Utc::now() + chrono::Duration::days(days_out),
    })
}
