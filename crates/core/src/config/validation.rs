//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or `source_host` is empty
    /// - `max_redirects` exceeds 20
    /// - `refresh_interval_secs` is under a minute or over a week
    /// - `fetch_pause_ms` exceeds one minute
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.source_host.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "source_host".into(), reason: "must not be empty".into() });
        }

        if self.max_redirects > 20 {
            return Err(ConfigError::Invalid { field: "max_redirects".into(), reason: "must not exceed 20".into() });
        }

        if self.refresh_interval_secs < 60 {
            return Err(ConfigError::Invalid {
                field: "refresh_interval_secs".into(),
                reason: "must be at least 60 seconds".into(),
            });
        }
        if self.refresh_interval_secs > 7 * 24 * 60 * 60 {
            return Err(ConfigError::Invalid {
                field: "refresh_interval_secs".into(),
                reason: "must not exceed one week".into(),
            });
        }

        if self.fetch_pause_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "fetch_pause_ms".into(),
                reason: "must not exceed one minute (60000ms)".into(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() }; // 5min 1sec
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_blank_source_host() {
        let config = AppConfig { source_host: "  ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "source_host"));
    }

    #[test]
    fn test_validate_too_many_redirects() {
        let config = AppConfig { max_redirects: 21, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_redirects"));
    }

    #[test]
    fn test_validate_refresh_interval_bounds() {
        let config = AppConfig { refresh_interval_secs: 59, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "refresh_interval_secs"));

        let config = AppConfig { refresh_interval_secs: 7 * 24 * 60 * 60 + 1, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "refresh_interval_secs"));
    }

    #[test]
    fn test_validate_fetch_pause_limit() {
        let config = AppConfig { fetch_pause_ms: 60_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "fetch_pause_ms"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            timeout_ms: 100,
            refresh_interval_secs: 60,
            fetch_pause_ms: 60_000,
            max_redirects: 0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
