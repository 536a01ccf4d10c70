//! Configuration management

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::guide::time::parse_timezone;
use crate::guide::{CLOCK_TICK, REFRESH_TICK};

/// Environment variable that overrides the configured backend URL
pub const BACKEND_URL_ENV: &str = "TV_SCHEDULE_BACKEND_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_refresh_mins")]
    pub refresh_interval_mins: u64,
    #[serde(default = "default_clock_secs")]
    pub clock_interval_secs: u64,
    /// IANA zone used for the clock, "today" and the now-indicator
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    /// Center the grid on the now-indicator when a schedule first appears
    #[serde(default = "default_true")]
    pub scroll_to_now: bool,
}

fn default_backend_url() -> String { "http://localhost:8001".to_string() }
fn default_refresh_mins() -> u64 { REFRESH_TICK.as_secs() / 60 }
fn default_clock_secs() -> u64 { CLOCK_TICK.as_secs() }
fn default_timezone() -> String { "America/New_York".to_string() }
fn default_request_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_true() -> bool { true }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            refresh_interval_mins: default_refresh_mins(),
            clock_interval_secs: default_clock_secs(),
            timezone: default_timezone(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: String::new(),
            dark_mode: true,
            scroll_to_now: true,
        }
    }
}

impl AppConfig {
    fn config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("tv_schedule");
        path.push("config.json");
        path
    }

    /// Load the config file, writing defaults if none exists yet, then apply
    /// the environment override. Problems are logged and fall back to defaults.
    pub fn load() -> Self {
        let path = Self::config_path();

        let mut config = if path.exists() {
            match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("{}; using defaults", e);
                    Self::default()
                }
            }
        } else {
            let config = Self::default();
            if let Err(e) = config.save_to(&path) {
                log::warn!("Could not write default config: {}", e);
            }
            config
        };

        config.apply_env(std::env::var(BACKEND_URL_ENV).ok());
        config
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }

    /// Backend URL from the environment wins over the file
    pub fn apply_env(&mut self, backend_url: Option<String>) {
        if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
            log::info!("Using backend URL from {}", BACKEND_URL_ENV);
            self.backend_url = url.trim().to_string();
        }
    }

    pub fn timezone(&self) -> Tz {
        parse_timezone(&self.timezone).unwrap_or_else(|| {
            log::warn!("Unknown timezone '{}', using America/New_York", self.timezone);
            chrono_tz::America::New_York
        })
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_mins.max(1) * 60)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_secs(self.clock_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AppConfig::default();
        assert_eq!(c.refresh_interval(), Duration::from_secs(900));
        assert_eq!(c.clock_interval(), Duration::from_secs(60));
        assert_eq!(c.timezone(), chrono_tz::America::New_York);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"backend_url": "http://tv.local:9000", "refresh_interval_mins": 5}"#).unwrap();

        let c = AppConfig::load_from(&path).unwrap();
        assert_eq!(c.backend_url, "http://tv.local:9000");
        assert_eq!(c.refresh_interval(), Duration::from_secs(300));
        assert_eq!(c.clock_interval_secs, 60);
        assert!(c.dark_mode);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut c = AppConfig::default();
        c.timezone = "America/Chicago".to_string();
        c.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded, c);
        assert_eq!(loaded.timezone(), chrono_tz::America::Chicago);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Parse { .. })));
        assert!(matches!(
            AppConfig::load_from(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_env_override() {
        let mut c = AppConfig::default();
        c.apply_env(None);
        assert_eq!(c.backend_url, "http://localhost:8001");

        c.apply_env(Some("   ".to_string()));
        assert_eq!(c.backend_url, "http://localhost:8001");

        c.apply_env(Some(" https://tv.example.com ".to_string()));
        assert_eq!(c.backend_url, "https://tv.example.com");
    }

    #[test]
    fn test_bad_values_are_clamped() {
        let c = AppConfig {
            refresh_interval_mins: 0,
            clock_interval_secs: 0,
            timezone: "Nowhere/Land".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(c.refresh_interval(), Duration::from_secs(60));
        assert_eq!(c.clock_interval(), Duration::from_secs(1));
        assert_eq!(c.timezone(), chrono_tz::America::New_York);
    }
}
