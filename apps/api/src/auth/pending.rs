use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

/// How long a login has to come back through the callback.
pub const DEFAULT_STATE_TTL: Duration = Duration::from_secs(10 * 60);

/// Most logins allowed in flight; the oldest state is evicted past this.
pub const MAX_PENDING_STATES: usize = 1024;

/// OAuth `state` values issued by `/auth/google/login` and not yet used.
/// Each value is single-use and expires after the TTL.
pub struct PendingStates {
    ttl: Duration,
    capacity: usize,
    issued: Mutex<HashMap<String, Instant>>,
}

impl PendingStates {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            issued: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a fresh random state, dropping expired ones and, when the
    /// cache is full, the oldest outstanding one.
    pub fn issue(&self) -> String {
        let state = Uuid::new_v4().simple().to_string();
        let mut issued = self.issued.lock();
        let ttl = self.ttl;
        issued.retain(|_, at| at.elapsed() < ttl);

        while issued.len() >= self.capacity {
            let Some(oldest) = issued
                .iter()
                .min_by_key(|(_, at)| **at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            issued.remove(&oldest);
            debug!("Pending OAuth state cache full, evicted oldest login");
        }

        issued.insert(state.clone(), Instant::now());
        state
    }

    /// Removes `state` and reports whether it was issued and still fresh.
    pub fn consume(&self, state: &str) -> bool {
        self.issued
            .lock()
            .remove(state)
            .is_some_and(|at| at.elapsed() < self.ttl)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.issued.lock().len()
    }
}

impl Default for PendingStates {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_TTL, MAX_PENDING_STATES)
    }
}
