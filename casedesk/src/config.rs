//! Configuration management for the casedesk demo.
//!
//! Loads configuration from environment variables with sensible defaults.

use casedesk_runtime::StoreConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Mock backend configuration
    pub backend: BackendConfig,
    /// Store configuration
    pub store: StoreSettings,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. `info`, `casedesk=debug`)
    pub level: String,
}

/// Mock backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Multiplier applied to every simulated latency (0 disables latency)
    pub latency_scale: f64,
    /// Seed the backends with the bundled fixtures
    pub seed_fixtures: bool,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Capacity of the action broadcast channel
    pub broadcast_capacity: usize,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            logging: LoggingConfig {
                level: env::var("CASEDESK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            backend: BackendConfig {
                latency_scale: env::var("CASEDESK_LATENCY_SCALE")
                    .ok()
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|scale| scale.is_finite() && *scale >= 0.0)
                    .unwrap_or(1.0),
                seed_fixtures: env::var("CASEDESK_SEED_FIXTURES")
                    .ok()
                    .and_then(|s| parse_bool(&s))
                    .unwrap_or(true),
            },
            store: StoreSettings {
                broadcast_capacity: env::var("CASEDESK_BROADCAST_CAPACITY")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(16),
                shutdown_timeout_secs: env::var("CASEDESK_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            },
        }
    }

    /// Runtime configuration for the [`Store`](casedesk_runtime::Store)
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(
            self.store.broadcast_capacity,
            Duration::from_secs(self.store.shutdown_timeout_secs),
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            backend: BackendConfig {
                latency_scale: 1.0,
                seed_fixtures: true,
            },
            store: StoreSettings {
                broadcast_capacity: 16,
                shutdown_timeout_secs: 30,
            },
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_store_config() {
        let config = Config::default().store_config();
        assert_eq!(config.broadcast_capacity, 16);
        assert_eq!(config.default_shutdown_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
