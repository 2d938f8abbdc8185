mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod prep;
mod resume;
mod routes;
mod scheduler;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::google::GoogleOAuth;
use crate::auth::pending::PendingStates;
use crate::config::{AiBackend, Config};
use crate::db::MockDb;
use crate::llm_client::LlmClient;
use crate::prep::analyzer::{PrepAnalyzer, StubPrepAnalyzer};
use crate::prep::openai::OpenAiPrepAnalyzer;
use crate::routes::{build_router, cors_layer};
use crate::scheduler::checker::spawn_periodic_checker;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Smart Job Tracker API v{}", env!("CARGO_PKG_VERSION"));

    let db = Arc::new(MockDb::new());

    let oauth = Arc::new(GoogleOAuth::new(config.google.clone())?);
    info!(redirect_uri = %config.google.redirect_uri, "Google OAuth client initialized");

    // StubPrepAnalyzer by default; AI_BACKEND=openai routes prep through llm_client
    let analyzer: Arc<dyn PrepAnalyzer> = match config.ai_backend {
        AiBackend::Stub => Arc::new(StubPrepAnalyzer),
        AiBackend::OpenAi => {
            let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_model.clone())?;
            info!("LLM client initialized (model: {})", llm.model());
            Arc::new(OpenAiPrepAnalyzer(llm))
        }
    };
    info!("Prep analyzer: {}", analyzer.backend());

    if spawn_periodic_checker(db.clone(), config.checker.clone()).is_none() {
        info!("Periodic inbox checker disabled (CHECKER_INTERVAL_SECS=0)");
    }

    let state = AppState {
        db,
        config: config.clone(),
        oauth,
        pending_states: Arc::new(PendingStates::default()),
        analyzer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
