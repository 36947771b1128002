use std::str::FromStr;

use anyhow::{Context, Result};

use crate::dialogue::steps::SetupFlow;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub max_message_chars: usize,
    pub page_context_ttl_secs: u64,
    pub setup_flow: SetupFlow,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mcq_asks_job_description = match std::env::var("SETUP_MCQ_JOB_DESCRIPTION") {
            Ok(raw) => parse_flag(&raw).with_context(|| {
                format!("SETUP_MCQ_JOB_DESCRIPTION must be true/false, got '{raw}'")
            })?,
            Err(_) => SetupFlow::default().mcq_asks_job_description,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: optional_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_message_chars: optional_env("MAX_MESSAGE_CHARS", 2000)?,
            page_context_ttl_secs: optional_env("PAGE_CONTEXT_TTL_SECS", 3600)?,
            setup_flow: SetupFlow {
                mcq_asks_job_description,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            redis_url: "redis://localhost".to_string(),
            anthropic_api_key: "test-key".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            max_message_chars: 2000,
            page_context_ttl_secs: 60,
            setup_flow: SetupFlow::default(),
        }
    }
}
