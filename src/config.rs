//! Configuration module
//!
//! TOML-backed configuration for the dashboard core, with per-field serde
//! defaults so a partial file (or none at all) still yields a runnable
//! setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend base URL (the development backend)
fn default_base_url() -> String {
    "http://localhost:8082".to_string()
}

/// Default per-request timeout in seconds
fn default_request_timeout_secs() -> u64 {
    10
}

/// Default refresh interval in seconds
fn default_refresh_interval_secs() -> u64 {
    5
}

/// Main dashboard configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    /// Backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Live refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,
}

/// Where and how to reach the café backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendConfig {
    /// Base URL, scheme and host, no trailing path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl BackendConfig {
    /// Per-request timeout as a Duration
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Cadence of the live refresh loop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefreshConfig {
    /// Seconds between scheduled refresh passes
    #[serde(default = "default_refresh_interval_secs")]
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl RefreshConfig {
    /// Refresh interval as a Duration
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &str) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path))?;
    Ok(config)
}

/// Write a default configuration file
pub fn create_default_config(path: &str) -> Result<Config> {
    let config = Config::default();
    let contents = toml::to_string_pretty(&config).context("Failed to serialize config")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write config file: {}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8082");
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.refresh.interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: Config = toml::from_str(
            r#"
            [backend]
            base_url = "https://cafe.example.com"

            [refresh]
            interval_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://cafe.example.com");
        // Untouched fields keep their defaults
        assert_eq!(config.backend.request_timeout_secs, 10);
        assert_eq!(config.refresh.interval_secs, 30);
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_create_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let created = create_default_config(path).unwrap();
        let loaded = load_config(path).unwrap();
        assert_eq!(created, loaded);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(load_config("/nonexistent/brewboard-config.toml").is_err());
    }
}
