//! Shared configuration loader for the recommendation service
//!
//! All configuration is read from environment variables with the
//! `ARTICLE_RECO_` prefix, optionally seeded from a `.env` file through
//! dotenvy. Override hierarchy: defaults < .env < environment.
//!
//! # Example
//!
//! ```no_run
//! use article_reco_core::config::{load_dotenv, ConfigLoader, ServiceConfig};
//!
//! # fn example() -> Result<(), article_reco_core::RecoError> {
//! load_dotenv();
//!
//! let service_config = ServiceConfig::from_env()?;
//! service_config.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::RecoError;
use crate::observability::LogFormat;
use std::time::Duration;

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables
    ///
    /// Missing optional values fall back to the type's defaults.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a required variable is missing or a
    /// value cannot be parsed.
    fn from_env() -> Result<Self, RecoError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), RecoError>;
}

/// HTTP service configuration
///
/// # Environment Variables
///
/// - `ARTICLE_RECO_SERVICE_HOST` (optional): bind host (default: "0.0.0.0")
/// - `ARTICLE_RECO_SERVICE_PORT` (optional): bind port (default: 8082)
/// - `ARTICLE_RECO_SERVICE_LOG_LEVEL` (optional): log level (default: "info")
/// - `ARTICLE_RECO_SERVICE_LOG_FORMAT` (optional): "json" or "pretty" (default: "json")
/// - `ARTICLE_RECO_SERVICE_REQUEST_TIMEOUT` (optional): per-request budget in seconds (default: 60)
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Service bind host
    pub host: String,
    /// Service bind port
    pub port: u16,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Time allowed for loading tables and scoring one request
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl ConfigLoader for ServiceConfig {
    fn from_env() -> Result<Self, RecoError> {
        let defaults = ServiceConfig::default();

        let host = std::env::var("ARTICLE_RECO_SERVICE_HOST")
            .or_else(|_| std::env::var("HOST"))
            .unwrap_or(defaults.host);

        let port = parse_env_var("ARTICLE_RECO_SERVICE_PORT", defaults.port)?;

        let log_level = std::env::var("ARTICLE_RECO_SERVICE_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(defaults.log_level);

        let log_format = parse_env_var("ARTICLE_RECO_SERVICE_LOG_FORMAT", defaults.log_format)?;

        let request_timeout_secs = parse_env_var("ARTICLE_RECO_SERVICE_REQUEST_TIMEOUT", 60u64)?;

        Ok(Self {
            host,
            port,
            log_level,
            log_format,
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    fn validate(&self) -> Result<(), RecoError> {
        if self.port == 0 {
            return Err(RecoError::config(
                "port must be greater than 0",
                "ARTICLE_RECO_SERVICE_PORT",
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(RecoError::config(
                format!(
                    "Invalid log_level '{}'. Must be one of: {}",
                    self.log_level,
                    valid_log_levels.join(", ")
                ),
                "ARTICLE_RECO_SERVICE_LOG_LEVEL",
            ));
        }

        if self.request_timeout.as_secs() == 0 {
            return Err(RecoError::config(
                "request_timeout must be greater than 0 seconds",
                "ARTICLE_RECO_SERVICE_REQUEST_TIMEOUT",
            ));
        }

        Ok(())
    }
}

/// Parse an environment variable, falling back to `default` when unset
///
/// # Errors
///
/// Returns a `ConfigurationError` if the variable is set but cannot be parsed.
pub fn parse_env_var<T>(key: &str, default: T) -> Result<T, RecoError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.trim()
                .parse::<T>()
                .map_err(|e| RecoError::config(format!("Failed to parse {}: {}", key, e), key))
        })
        .unwrap_or(Ok(default))
}

/// Parse an optional environment variable; unset or empty yields `None`
pub fn parse_optional_env_var<T>(key: &str) -> Result<Option<T>, RecoError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| RecoError::config(format!("Failed to parse {}: {}", key, e), key)),
        _ => Ok(None),
    }
}

/// Parse a comma-separated environment variable such as `"5,10"`
pub fn parse_env_list<T>(key: &str, default: Vec<T>) -> Result<Vec<T>, RecoError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) => v
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<T>().map_err(|e| {
                    RecoError::config(format!("Failed to parse {} entry '{}': {}", key, part, e), key)
                })
            })
            .collect(),
        Err(_) => Ok(default),
    }
}

/// Load .env file if present
///
/// A missing .env file is not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }
}
