use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Gemini API key. When absent every collaborator call fails fast and the
    /// per-component fallbacks take over.
    pub gemini_api_key: Option<String>,
    /// Secret used to sign session cookies. A random key is generated when absent.
    pub session_secret: Option<String>,
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: Option<u64>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS")?.unwrap_or(10),
            gemini_api_key: optional_env("GEMINI_API_KEY").or_else(|| optional_env("GOOGLE_API_KEY")),
            session_secret: optional_env("SESSION_SECRET").or_else(|| optional_env("SECRET_KEY")),
            llm_max_attempts: parse_env::<u32>("LLM_MAX_ATTEMPTS")?.unwrap_or(1).max(1),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS")?,
            port: parse_env("PORT")?.unwrap_or(8080),
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, stripping whitespace and surrounding quotes left over
/// from copy/paste. Empty values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| clean_env_value(&v))
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value: '{raw}'")),
        None => Ok(None),
    }
}

fn clean_env_value(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_matches('"').trim_matches('\'').trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
