use std::sync::Arc;

use crate::auth::google::OAuthProvider;
use crate::auth::pending::PendingStates;
use crate::config::Config;
use crate::db::MockDb;
use crate::prep::analyzer::PrepAnalyzer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<MockDb>,
    pub config: Config,
    /// Pluggable OAuth backend. Default: GoogleOAuth.
    pub oauth: Arc<dyn OAuthProvider>,
    /// OAuth `state` values awaiting their callback.
    pub pending_states: Arc<PendingStates>,
    /// Pluggable prep analyzer. Default: StubPrepAnalyzer. Swap via AI_BACKEND.
    pub analyzer: Arc<dyn PrepAnalyzer>,
}
