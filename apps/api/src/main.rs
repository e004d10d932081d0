mod config;
mod db;
mod errors;
mod identity;
mod intake;
mod jobs;
mod llm_client;
mod matching;
mod models;
mod resume;
mod routes;
mod session;
mod state;
mod translate;
mod validation;

use anyhow::{bail, Result};
use axum_extra::extract::cookie::Key;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, PgStore};
use crate::llm_client::{LlmClient, LlmPolicy};
use crate::routes::build_router;
use crate::state::AppState;

/// Minimum master key length accepted by `Key::derive_from`.
const MIN_SESSION_SECRET_BYTES: usize = 32;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillLink API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    let store = Arc::new(PgStore::new(pool));

    // Initialize the one LLM client every component shares
    let policy = LlmPolicy {
        max_attempts: config.llm_max_attempts,
        timeout: config.llm_timeout_secs.map(Duration::from_secs),
    };
    let llm = LlmClient::new(config.gemini_api_key.clone(), policy)?;
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; AI features will return their fallback values");
    }
    info!(
        "LLM client initialized (fast: {}, pro: {}, attempts: {})",
        llm_client::FAST_MODEL,
        llm_client::PRO_MODEL,
        policy.max_attempts
    );

    let session_key = session_key(&config)?;

    // Build app state
    let state = AppState {
        store,
        llm: Arc::new(llm),
        session_key,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Cookie signing key. Derived from the configured secret so sessions survive
/// restarts; random otherwise.
fn session_key(config: &Config) -> Result<Key> {
    match &config.session_secret {
        Some(secret) if secret.len() < MIN_SESSION_SECRET_BYTES => {
            bail!("SESSION_SECRET must be at least {MIN_SESSION_SECRET_BYTES} bytes long")
        }
        Some(secret) => Ok(Key::derive_from(secret.as_bytes())),
        None => {
            warn!("SESSION_SECRET is not set; using a random key, sessions will not survive a restart");
            Ok(Key::generate())
        }
    }
}
