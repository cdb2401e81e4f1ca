//! Configuration validation rules.
//!
//! Validation runs after layered loading; an unset key-value store is a
//! supported deployment mode, so only values that are present get checked.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `base_url` is empty or not an http(s) URL
    /// - `listen_addr` is empty
    /// - `subscriber_cookie` is empty
    /// - `kv_timeout_ms` is under 100ms or over 5 minutes
    /// - a set `kv_rest_url` or `generator_url` is not an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.base_url) {
            return Err(ConfigError::Invalid {
                field: "base_url".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        if self.listen_addr.is_empty() {
            return Err(ConfigError::Invalid { field: "listen_addr".into(), reason: "must not be empty".into() });
        }

        if self.subscriber_cookie.is_empty() {
            return Err(ConfigError::Invalid {
                field: "subscriber_cookie".into(),
                reason: "must not be empty".into(),
            });
        }

        if self.kv_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "kv_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.kv_timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "kv_timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if let Some(url) = self.kv_rest_url.as_deref()
            && !url.is_empty()
            && !is_http_url(url)
        {
            return Err(ConfigError::Invalid {
                field: "kv_rest_url".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        if let Some(url) = self.generator_url.as_deref()
            && !is_http_url(url)
        {
            return Err(ConfigError::Invalid {
                field: "generator_url".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        if self.kv_rest_url.is_some() != self.kv_rest_token.is_some() {
            tracing::warn!(
                "only one of kv_rest_url / kv_rest_token is set; \
                 the key-value store stays disabled"
            );
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config = AppConfig { base_url: "leafkit.app".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "base_url"));
    }

    #[test]
    fn test_validate_empty_listen_addr() {
        let config = AppConfig { listen_addr: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "listen_addr"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let config = AppConfig { kv_timeout_ms: 50, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "kv_timeout_ms"));

        let config = AppConfig { kv_timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "kv_timeout_ms"));

        let config = AppConfig { kv_timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_kv_url() {
        let config = AppConfig { kv_rest_url: Some("redis://host".into()), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "kv_rest_url"));
    }

    #[test]
    fn test_validate_bad_generator_url() {
        let config = AppConfig { generator_url: Some("gen.internal".into()), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "generator_url"));
    }
}
