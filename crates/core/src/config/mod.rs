//! Application configuration with layered loading.
//!
//! Loading precedence (highest wins):
//! 1. Environment variables (LEAFKIT_*)
//! 2. TOML config file (if LEAFKIT_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! The key-value store settings are deliberately optional: a deployment
//! without them runs with rate limiting and result persistence disabled.

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// REST endpoint of the remote key-value store.
    ///
    /// Set via LEAFKIT_KV_REST_URL. Unset disables caching and rate limiting.
    #[serde(default)]
    pub kv_rest_url: Option<String>,

    /// Bearer credential for the key-value store.
    ///
    /// Set via LEAFKIT_KV_REST_TOKEN. Unset disables caching and rate limiting.
    #[serde(default)]
    pub kv_rest_token: Option<String>,

    /// Public base URL used for shareable links and the sitemap.
    ///
    /// Set via LEAFKIT_BASE_URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Socket address the HTTP server binds to.
    ///
    /// Set via LEAFKIT_LISTEN_ADDR.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Name of the cookie whose presence marks the subscriber tier.
    ///
    /// Set via LEAFKIT_SUBSCRIBER_COOKIE.
    #[serde(default = "default_subscriber_cookie")]
    pub subscriber_cookie: String,

    /// Endpoint of the upstream result generator.
    ///
    /// Set via LEAFKIT_GENERATOR_URL. Required only when a tool is invoked.
    #[serde(default)]
    pub generator_url: Option<String>,

    /// Timeout for key-value store requests, in milliseconds.
    ///
    /// Set via LEAFKIT_KV_TIMEOUT_MS.
    #[serde(default = "default_kv_timeout_ms")]
    pub kv_timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://leafkit.app".into()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".into()
}

fn default_subscriber_cookie() -> String {
    "lk_member".into()
}

fn default_kv_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            kv_rest_url: None,
            kv_rest_token: None,
            base_url: default_base_url(),
            listen_addr: default_listen_addr(),
            subscriber_cookie: default_subscriber_cookie(),
            generator_url: None,
            kv_timeout_ms: default_kv_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// KV timeout as Duration for use with reqwest.
    pub fn kv_timeout(&self) -> Duration {
        Duration::from_millis(self.kv_timeout_ms)
    }

    /// Whether the key-value store is provisioned for this deployment.
    pub fn kv_configured(&self) -> bool {
        self.kv_rest_url.as_deref().is_some_and(|u| !u.is_empty())
            && self.kv_rest_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source cannot be read or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LEAFKIT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LEAFKIT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Generator endpoint, for deferred validation at call time.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the generator endpoint is not set.
    pub fn require_generator_url(&self) -> Result<&str, ConfigError> {
        self.generator_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "generator_url".into(),
            hint: "Set LEAFKIT_GENERATOR_URL environment variable".into(),
        })
    }
}
