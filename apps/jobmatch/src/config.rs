use std::str::FromStr;

use anyhow::{Context, Result};

/// Engine configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Only required when the LLM-backed analyzer is used.
    pub anthropic_api_key: Option<String>,
    /// `EnvFilter` directives for the tracing subscriber.
    pub rust_log: String,
    /// Default number of analyzer calls in flight during one match run.
    pub match_concurrency: usize,
    pub standard_job_quota: u32,
    pub premium_job_quota: u32,
    pub llm_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            rust_log: "jobmatch=info".to_string(),
            match_concurrency: 4,
            standard_job_quota: 10,
            premium_job_quota: 50,
            llm_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let match_concurrency: usize =
            parse_env_or("MATCH_CONCURRENCY", defaults.match_concurrency)?;
        if match_concurrency == 0 {
            anyhow::bail!("MATCH_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            match_concurrency,
            standard_job_quota: parse_env_or("STANDARD_JOB_QUOTA", defaults.standard_job_quota)?,
            premium_job_quota: parse_env_or("PREMIUM_JOB_QUOTA", defaults.premium_job_quota)?,
            llm_timeout_secs: parse_env_or("LLM_TIMEOUT_SECS", defaults.llm_timeout_secs)?,
        })
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.anthropic_api_key
            .as_deref()
            .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")
    }
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid number, got '{raw}'"))
}
