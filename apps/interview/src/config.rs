use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Where the finalized session record is written.
    pub log_path: String,
    /// Safety rail for non-interactive runs: 0 means unlimited.
    pub max_turns: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            log_path: std::env::var("INTERVIEW_LOG_PATH")
                .unwrap_or_else(|_| "interview_log.json".to_string()),
            max_turns: std::env::var("INTERVIEW_MAX_TURNS")
                .unwrap_or_else(|_| "0".to_string())
                .parse::<u32>()
                .context("INTERVIEW_MAX_TURNS must be a non-negative integer")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
