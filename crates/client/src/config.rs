//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DOKAN_API_URL` - Base URL of the REST backend (e.g., `https://api.dokan.com.bd`)
//!
//! ## Optional
//! - `DOKAN_TOKEN_PATH` - Where the bearer token is persisted (default: `~/.dokan/token.json`)
//! - `DOKAN_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 15)
//! - `DOKAN_CACHE_TTL_SECS` - Catalog and shipping settings cache TTL (default: 300)
//! - `DOKAN_API_TOKEN` - Bearer token to use instead of the persisted one

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const TOKEN_DIR: &str = ".dokan";
const TOKEN_FILE: &str = "token.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
///
/// Implements `Debug` manually to redact the token override.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend
    pub api_url: Url,
    /// File the bearer token is persisted to
    pub token_path: PathBuf,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// TTL for cached catalog and shipping settings responses
    pub cache_ttl: Duration,
    /// Token that overrides the persisted one (CI, scripted admin tasks)
    pub api_token: Option<SecretString>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url.as_str())
            .field("token_path", &self.token_path)
            .field("request_timeout", &self.request_timeout)
            .field("cache_ttl", &self.cache_ttl)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for a backend at `api_url` with default settings.
    #[must_use]
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            token_path: default_token_path(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            api_token: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `DOKAN_API_URL` is missing or any variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_required_env("DOKAN_API_URL")?)?;
        let request_timeout = get_secs_or_default("DOKAN_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let cache_ttl = get_secs_or_default("DOKAN_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        let token_path = get_optional_env("DOKAN_TOKEN_PATH")
            .map_or_else(default_token_path, PathBuf::from);
        let api_token = get_optional_env("DOKAN_API_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .map(SecretString::from);

        Ok(Self {
            api_url,
            token_path,
            request_timeout,
            cache_ttl,
            api_token,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get a duration in whole seconds with a default value.
fn get_secs_or_default(key: &str, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(Duration::from_secs(default));
    };
    parse_secs(key, &raw)
}

fn parse_secs(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse the backend URL, requiring http(s).
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("DOKAN_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "DOKAN_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// `~/.dokan/token.json`, or `./.dokan/token.json` when no home is set.
fn default_token_path() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map_or_else(PathBuf::new, PathBuf::from)
        .join(TOKEN_DIR)
        .join(TOKEN_FILE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url() {
        let url = parse_api_url(" https://api.dokan.test ").unwrap();
        assert_eq!(url.host_str(), Some("api.dokan.test"));
    }

    #[test]
    fn test_parse_api_url_rejects_other_schemes() {
        assert!(matches!(
            parse_api_url("ftp://api.dokan.test"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_api_url("not a url").is_err());
    }

    #[test]
    fn test_parse_secs() {
        assert_eq!(parse_secs("T", "30").unwrap(), Duration::from_secs(30));
        assert!(matches!(
            parse_secs("T", "soon"),
            Err(ConfigError::InvalidEnvVar(key, _)) if key == "T"
        ));
    }

    #[test]
    fn test_default_token_path_file_name() {
        let path = default_token_path();
        assert!(path.ends_with(".dokan/token.json"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = ClientConfig::new(Url::parse("http://localhost:8080").unwrap());
        config.api_token = Some(SecretString::from("super_secret_bearer"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:8080"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_bearer"));
    }
}
