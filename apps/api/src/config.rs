use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8000/auth/google/callback";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost,http://localhost:8501,http://127.0.0.1:8501";

/// Which prep analyzer backs `/api/ai/prep`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiBackend {
    Stub,
    OpenAi,
}

impl FromStr for AiBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stub" | "mock" => Ok(AiBackend::Stub),
            "openai" => Ok(AiBackend::OpenAi),
            other => anyhow::bail!("unknown AI backend '{other}' (expected 'stub' or 'openai')"),
        }
    }
}

/// Google OAuth client registration.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Tuning for the simulated inbox checker.
#[derive(Debug, Clone)]
pub struct CheckerConfig {
    pub latency_ms: u64,
    /// Probability in [0, 1] that a check finds a new interview.
    pub hit_rate: f64,
    /// 0 disables the periodic sweep.
    pub interval_secs: u64,
}

/// Application configuration loaded from environment variables.
/// Every key has a demo default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub google: GoogleOAuthConfig,
    /// Dashboard URL to bounce back to after a successful OAuth callback.
    pub frontend_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub ai_backend: AiBackend,
    pub openai_api_key: String,
    pub openai_model: String,
    pub checker: CheckerConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing is testable
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let hit_rate: f64 = parse_or(&lookup, "CHECKER_HIT_RATE", 0.5)?;
        if !(0.0..=1.0).contains(&hit_rate) {
            anyhow::bail!("CHECKER_HIT_RATE must be between 0.0 and 1.0, got {hit_rate}");
        }

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8000)?,
            rust_log: get("RUST_LOG", "info"),
            google: GoogleOAuthConfig {
                client_id: get("GOOGLE_CLIENT_ID", "dummy_client_id"),
                client_secret: get("GOOGLE_CLIENT_SECRET", "dummy_client_secret"),
                redirect_uri: get("GOOGLE_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            },
            frontend_url: lookup("FRONTEND_URL").filter(|s| !s.trim().is_empty()),
            cors_origins: get("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            ai_backend: get("AI_BACKEND", "stub").parse()?,
            openai_api_key: get("OPENAI_API_KEY", "sk-dummy-key"),
            openai_model: get("OPENAI_MODEL", "gpt-4o-mini"),
            checker: CheckerConfig {
                latency_ms: parse_or(&lookup, "CHECKER_LATENCY_MS", 1000)?,
                hit_rate,
                interval_secs: parse_or(&lookup, "CHECKER_INTERVAL_SECS", 0)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
