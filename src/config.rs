//! Bridge configuration
//!
//! Settings come from built-in defaults, an optional JSON document, and
//! environment overrides. Unparsable environment values are ignored and the
//! previous value is kept.

use std::env;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Enables or disables the remote query cache
pub const ENV_CACHE_ENABLED: &str = "STEAMPIPE_CACHE";
/// Maximum cache TTL in seconds
pub const ENV_CACHE_MAX_TTL: &str = "STEAMPIPE_CACHE_MAX_TTL";
/// Minimum log level
pub const ENV_LOG_LEVEL: &str = "STEAMPIPE_LOG_LEVEL";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Configuration shared by every table of a module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Connection alias sent with every remote request (default: "plugin")
    #[serde(default = "default_connection")]
    pub connection: String,

    /// Whether the remote source may serve cached results (default: true)
    #[serde(default = "default_cache_enabled")]
    pub cache_enabled: bool,

    /// Upper bound for cached result age (default: 10 hours)
    #[serde(default = "default_cache_max_ttl_secs")]
    pub cache_max_ttl_secs: i64,

    /// Minimum log level (default: "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Rows buffered between the remote producer and a cursor (default: 64)
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

fn default_connection() -> String {
    "plugin".to_string()
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_max_ttl_secs() -> i64 {
    10 * 60 * 60
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_stream_buffer() -> usize {
    64
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            connection: default_connection(),
            cache_enabled: default_cache_enabled(),
            cache_max_ttl_secs: default_cache_max_ttl_secs(),
            log_level: default_log_level(),
            stream_buffer: default_stream_buffer(),
        }
    }
}

impl BridgeConfig {
    /// Defaults for the given connection alias
    pub fn for_connection(connection: impl Into<String>) -> Self {
        Self {
            connection: connection.into(),
            ..Default::default()
        }
    }

    /// Parse a JSON document; missing keys take their defaults
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Defaults overridden by the process environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Applies overrides from a key lookup (the environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(enabled) = lookup(ENV_CACHE_ENABLED).and_then(|v| parse_bool(&v)) {
            self.cache_enabled = enabled;
        }
        if let Some(ttl) = lookup(ENV_CACHE_MAX_TTL).and_then(|v| v.trim().parse::<i64>().ok()) {
            self.cache_max_ttl_secs = ttl;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            if level.parse::<Severity>().is_ok() {
                self.log_level = level.trim().to_ascii_lowercase();
            }
        }
    }

    /// Resolved log severity; falls back to WARN
    pub fn log_severity(&self) -> Severity {
        self.log_level.parse().unwrap_or(Severity::Warn)
    }

    /// Applies the logging settings to the process-wide logger
    pub fn install_logging(&self) {
        Logger::set_name(&self.connection);
        Logger::set_min_severity(self.log_severity());
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("cache_enabled", &self.cache_enabled.to_string()),
                ("connection", &self.connection),
                ("log_level", self.log_severity().as_str()),
            ],
        );
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "on" => Some(true),
        "false" | "f" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
