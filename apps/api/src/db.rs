//! In-memory mock store standing in for a real database.
//!
//! Users and applications live in two maps behind one `RwLock`. Every
//! operation takes the lock for the duration of a single map access, so no
//! guard is ever held across an `.await`.

use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use rand::Rng;
use tracing::{debug, info};

use crate::models::application::{Application, NewApplication, STATUS_UPCOMING};
use crate::models::user::UserRecord;

#[derive(Default)]
struct Tables {
    users: HashMap<String, UserRecord>,
    applications: HashMap<String, Application>,
    /// Bumped each time the random suffix space is skipped.
    overflow_seq: u64,
}

/// The shared mock store. Cheap to share behind an `Arc`.
#[derive(Default)]
pub struct MockDb {
    tables: RwLock<Tables>,
}

impl MockDb {
    pub fn new() -> Self {
        info!("Mock store initialized (in-memory, non-durable)");
        Self::default()
    }

    /// Saves a user's refresh token, creating the user record if needed.
    pub fn save_user_token(&self, user_id: &str, refresh_token: &str) {
        let mut tables = self.tables.write();
        user_entry(&mut tables, user_id).refresh_token = Some(refresh_token.to_string());
        info!(user_id, "Refresh token saved");
    }

    pub fn get_user_token(&self, user_id: &str) -> Option<String> {
        self.tables
            .read()
            .users
            .get(user_id)
            .and_then(|u| u.refresh_token.clone())
    }

    /// Records profile details returned by the identity provider.
    pub fn save_user_profile(&self, user_id: &str, email: Option<&str>, name: Option<&str>) {
        let mut tables = self.tables.write();
        let user = user_entry(&mut tables, user_id);
        if let Some(email) = email {
            user.email = Some(email.to_string());
        }
        if let Some(name) = name {
            user.name = Some(name.to_string());
        }
    }

    pub fn save_user_resume(&self, user_id: &str, resume_text: &str) {
        let mut tables = self.tables.write();
        user_entry(&mut tables, user_id).resume_text = Some(resume_text.to_string());
        debug!(user_id, chars = resume_text.len(), "Resume text saved");
    }

    pub fn get_user_resume(&self, user_id: &str) -> Option<String> {
        self.tables
            .read()
            .users
            .get(user_id)
            .and_then(|u| u.resume_text.clone())
    }

    pub fn get_user_name(&self, user_id: &str) -> Option<String> {
        self.tables
            .read()
            .users
            .get(user_id)
            .and_then(|u| u.name.clone())
    }

    #[cfg(test)]
    pub fn get_user(&self, user_id: &str) -> Option<UserRecord> {
        self.tables.read().users.get(user_id).cloned()
    }

    /// IDs of every user that currently holds a refresh token.
    pub fn users_with_tokens(&self) -> Vec<String> {
        let tables = self.tables.read();
        let mut ids: Vec<String> = tables
            .users
            .values()
            .filter(|u| u.refresh_token.is_some())
            .map(|u| u.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// All applications for a user, ordered by interview date (then id).
    pub fn get_applications(&self, user_id: &str) -> Vec<Application> {
        let tables = self.tables.read();
        let mut apps: Vec<Application> = tables
            .applications
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        apps.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.app_id.cmp(&b.app_id)));
        apps
    }

    pub fn get_application(&self, app_id: &str) -> Option<Application> {
        self.tables.read().applications.get(app_id).cloned()
    }

    /// Inserts an application with a fresh `APP-<unix>-<nnn>` id and
    /// `Upcoming` status, returning the stored record.
    pub fn add_application(&self, new: NewApplication) -> Application {
        let mut tables = self.tables.write();
        insert_application(&mut tables, new, Utc::now().timestamp())
    }

    /// Inserts `seed` only if the user has no applications yet, under a
    /// single write lock. Returns whether anything was inserted.
    pub fn seed_applications_if_empty<F>(&self, user_id: &str, seed: F) -> bool
    where
        F: FnOnce() -> Vec<NewApplication>,
    {
        let mut tables = self.tables.write();
        if tables.applications.values().any(|a| a.user_id == user_id) {
            return false;
        }
        let now = Utc::now().timestamp();
        for new in seed() {
            insert_application(&mut tables, new, now);
        }
        true
    }
}

fn insert_application(tables: &mut Tables, new: NewApplication, now: i64) -> Application {
    let app_id = next_app_id(tables, now);

    let application = Application {
        app_id: app_id.clone(),
        user_id: new.user_id,
        company: new.company,
        role: new.role,
        jd_text: new.jd_text,
        date: new.date,
        status: STATUS_UPCOMING.to_string(),
    };
    tables.applications.insert(app_id, application.clone());
    debug!(app_id = %application.app_id, user_id = %application.user_id, "Application stored");
    application
}

fn user_entry<'a>(tables: &'a mut Tables, user_id: &str) -> &'a mut UserRecord {
    tables
        .users
        .entry(user_id.to_string())
        .or_insert_with(|| UserRecord::new(user_id))
}

const RANDOM_ID_ATTEMPTS: usize = 8;

/// `APP-<unix>-<nnn>` with a random three-digit suffix. After a few
/// collisions the suffix comes from a per-store counter starting at 1000,
/// which cannot clash with any three-digit suffix or earlier counter value.
fn next_app_id(tables: &mut Tables, now: i64) -> String {
    let mut rng = rand::rng();
    for _ in 0..RANDOM_ID_ATTEMPTS {
        let suffix: u16 = rng.random_range(100..=999);
        let candidate = format!("APP-{now}-{suffix}");
        if !tables.applications.contains_key(&candidate) {
            return candidate;
        }
    }

    let suffix = 1000 + tables.overflow_seq;
    tables.overflow_seq += 1;
    format!("APP-{now}-{suffix}")
}
