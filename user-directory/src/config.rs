//! Configuration management for the user directory.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Users API configuration
    pub api: ApiConfig,
    /// Screen configuration
    pub directory: DirectoryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Users API configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL
    pub base_url: String,
    /// Value for the `x-auth-api-token` header
    pub api_token: Option<String>,
    /// Bearer token for the identity guard
    pub bearer_token: Option<String>,
    /// Request timeout in seconds
    pub timeout: u64,
}

/// Screen configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Rows per table page
    pub per_page: usize,
    /// Seconds to wait for in-flight calls on shutdown
    pub shutdown_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter directive (`RUST_LOG` syntax)
    pub level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Falls back to default values if environment variables are not set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unset or empty tokens are treated as absent; numbers that fail to
    /// parse fall back to their defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            api: ApiConfig {
                base_url: lookup("USER_DIRECTORY_API_URL")
                    .unwrap_or_else(|| "http://localhost:8000".to_string()),
                api_token: non_empty("USER_DIRECTORY_API_TOKEN"),
                bearer_token: non_empty("USER_DIRECTORY_BEARER_TOKEN"),
                timeout: lookup("USER_DIRECTORY_HTTP_TIMEOUT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            directory: DirectoryConfig {
                per_page: lookup("USER_DIRECTORY_PER_PAGE")
                    .and_then(|v| v.parse().ok())
                    .filter(|per_page| *per_page > 0)
                    .unwrap_or(10),
                shutdown_timeout: lookup("SHUTDOWN_TIMEOUT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            },
            logging: LoggingConfig {
                level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            },
        }
    }

    /// Request timeout as a [`Duration`]
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    /// Shutdown timeout as a [`Duration`]
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.directory.shutdown_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.api_token, None);
        assert_eq!(config.api.bearer_token, None);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.directory.per_page, 10);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(5));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn reads_every_variable() {
        let config = Config::from_lookup(lookup(&[
            ("USER_DIRECTORY_API_URL", "https://agency.example.com"),
            ("USER_DIRECTORY_API_TOKEN", "key-123"),
            ("USER_DIRECTORY_BEARER_TOKEN", "jwt"),
            ("USER_DIRECTORY_HTTP_TIMEOUT", "3"),
            ("USER_DIRECTORY_PER_PAGE", "25"),
            ("SHUTDOWN_TIMEOUT", "9"),
            ("RUST_LOG", "user_directory=debug"),
        ]));

        assert_eq!(config.api.base_url, "https://agency.example.com");
        assert_eq!(config.api.api_token.as_deref(), Some("key-123"));
        assert_eq!(config.api.bearer_token.as_deref(), Some("jwt"));
        assert_eq!(config.api.timeout, 3);
        assert_eq!(config.directory.per_page, 25);
        assert_eq!(config.directory.shutdown_timeout, 9);
        assert_eq!(config.logging.level, "user_directory=debug");
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("USER_DIRECTORY_HTTP_TIMEOUT", "soon"),
            ("USER_DIRECTORY_PER_PAGE", "0"),
            ("USER_DIRECTORY_API_TOKEN", "  "),
        ]));

        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.directory.per_page, 10);
        assert_eq!(config.api.api_token, None);
    }
}
