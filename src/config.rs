//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;

/// Base URL used when `MARKET_API_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Log output format for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// Structured JSON, one object per event
    Json,
}

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without a trailing slash
    pub api_base_url: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_base_url = match env::var("MARKET_API_URL") {
            Ok(url) => normalize_base_url(&url)?,
            Err(_) => DEFAULT_API_BASE_URL.to_string(),
        };

        let log_format = match env::var("LOG_FORMAT") {
            Ok(v) => parse_log_format(&v)?,
            Err(_) => LogFormat::Pretty,
        };

        Ok(Self {
            api_base_url,
            log_format,
        })
    }

    /// Config pointing at an explicit base URL, everything else default.
    pub fn with_base_url(url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(url)?,
            ..Self::default()
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid("MARKET_API_URL", raw.to_string()));
    }
    Ok(trimmed.to_string())
}

fn parse_log_format(raw: &str) -> Result<LogFormat, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "pretty" | "text" | "" => Ok(LogFormat::Pretty),
        _ => Err(ConfigError::Invalid("LOG_FORMAT", raw.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
