//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LOTUS_API_URL` - Base URL of the storefront backend (e.g., <http://localhost:3000>)
//!
//! ## Optional
//! - `LOTUS_SESSION_PATH` - Path of the persisted session file (default: `.lotus-session.json`)
//! - `LOTUS_HTTP_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the storefront REST backend.
    pub api_url: Url,
    /// Where the session (identity + bearer token) is persisted.
    pub session_path: PathBuf,
    /// Timeout applied to every backend request.
    pub http_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_required_env("LOTUS_API_URL")?;
        let api_url = Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("LOTUS_API_URL".to_string(), e.to_string()))?;

        let session_path =
            PathBuf::from(get_env_or_default("LOTUS_SESSION_PATH", ".lotus-session.json"));

        let http_timeout = get_env_or_default("LOTUS_HTTP_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("LOTUS_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            api_url,
            session_path,
            http_timeout,
        })
    }
}

/// Get a required environment variable.
fn get_required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Get an environment variable with a default fallback.
fn get_env_or_default(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_env() {
        let err = get_required_env("LOTUS_TEST_DOES_NOT_EXIST");
        assert!(matches!(err, Err(ConfigError::MissingEnvVar(name)) if name == "LOTUS_TEST_DOES_NOT_EXIST"));
    }

    #[test]
    fn test_default_fallback() {
        assert_eq!(
            get_env_or_default("LOTUS_TEST_DOES_NOT_EXIST", "fallback"),
            "fallback"
        );
    }
}
