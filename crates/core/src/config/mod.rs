//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DOCMIRROR_*)
//! 2. TOML config file (if DOCMIRROR_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DOCMIRROR_*)
/// 2. TOML config file (if DOCMIRROR_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite document cache.
    ///
    /// Set via DOCMIRROR_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via DOCMIRROR_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-fetch timeout in milliseconds.
    ///
    /// Set via DOCMIRROR_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects the HTTP client follows.
    ///
    /// Set via DOCMIRROR_MAX_REDIRECTS environment variable.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Substring every source URL must contain.
    ///
    /// Set via DOCMIRROR_SOURCE_HOST environment variable.
    #[serde(default = "default_source_host")]
    pub source_host: String,

    /// Seconds between scheduled refresh passes.
    ///
    /// Set via DOCMIRROR_REFRESH_INTERVAL_SECS environment variable.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// Pause between consecutive fetches within one pass, in milliseconds.
    ///
    /// Set via DOCMIRROR_FETCH_PAUSE_MS environment variable.
    #[serde(default)]
    pub fetch_pause_ms: u64,

    /// Whether the first scheduled pass runs at boot instead of one period later.
    ///
    /// Set via DOCMIRROR_REFRESH_ON_START environment variable.
    #[serde(default = "default_true")]
    pub refresh_on_start: bool,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./docmirror.sqlite")
}

fn default_user_agent() -> String {
    "docmirror/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_source_host() -> String {
    "docs.google.com".into()
}

fn default_refresh_interval_secs() -> u64 {
    1800 // 30 minutes
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            source_host: default_source_host(),
            refresh_interval_secs: default_refresh_interval_secs(),
            fetch_pause_ms: 0,
            refresh_on_start: true,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Period of the recurring refresh trigger.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Courtesy pause between fetches of one pass.
    pub fn fetch_pause(&self) -> Duration {
        Duration::from_millis(self.fetch_pause_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DOCMIRROR_`
    /// 2. TOML file from `DOCMIRROR_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DOCMIRROR_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DOCMIRROR_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
