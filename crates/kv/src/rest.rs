//! REST client for the remote key-value store.
//!
//! ### Protocol
//!
//! - **Commands**: one command per request, path-encoded
//!   (`{base}/get/{key}`, `{base}/setex/{key}/{ttl}` with the value as the
//!   request body, `{base}/incr/{key}`, `{base}/expire/{key}/{ttl}`,
//!   `{base}/keys/{pattern}`).
//! - **Authentication**: `Authorization: Bearer <token>`.
//! - **Envelope**: `{"result": ...}` on success, `{"error": "..."}` when the
//!   store rejects a command.
//!
//! The adapter is constructed from two configuration values; if either is
//! unset it is simply absent and every dependent feature stays disabled.

use std::time::Duration;

use async_trait::async_trait;
use leafkit_core::{AppConfig, Error, KvStore};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

/// Response envelope returned for every command.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

/// Key-value store client over the REST protocol.
#[derive(Debug, Clone)]
pub struct RestKv {
    http: reqwest::Client,
    base: Url,
    token: String,
}

impl RestKv {
    /// Build a client for the given endpoint and bearer credential.
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, Error> {
        let base = Url::parse(base_url).map_err(|e| Error::KvProtocol(format!("invalid endpoint URL: {e}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::KvNetwork(e.to_string()))?;

        Ok(Self { http, base, token: token.to_string() })
    }

    /// Build the adapter from configuration.
    ///
    /// `Ok(None)` when the endpoint or credential is unset: that is a
    /// supported deployment mode, not an error.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, Error> {
        if !config.kv_configured() {
            return Ok(None);
        }
        // kv_configured() guarantees both values are present and non-empty.
        let url = config.kv_rest_url.as_deref().unwrap_or_default();
        let token = config.kv_rest_token.as_deref().unwrap_or_default();
        Ok(Some(Self::new(url, token, config.kv_timeout())?))
    }

    /// Execute one command; path segments are percent-encoded as needed.
    async fn command(&self, segments: &[&str], body: Option<&str>) -> Result<Value, Error> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::KvProtocol("endpoint URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);

        tracing::debug!(command = segments.first().copied().unwrap_or(""), "kv command");

        let request = match body {
            Some(value) => self.http.post(url).body(value.to_string()),
            None => self.http.get(url),
        };

        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::KvNetwork(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::KvStatus(status.as_u16()));
        }

        let envelope: Envelope = response.json().await.map_err(|e| Error::KvNetwork(e.to_string()))?;
        if let Some(error) = envelope.error {
            return Err(Error::KvProtocol(error));
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl KvStore for RestKv {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let result = self.command(&["get", key], None).await?;
        Ok(result_string(result))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), Error> {
        self.command(&["setex", key, &ttl_seconds.to_string()], Some(value))
            .await?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, Error> {
        let result = self.command(&["incr", key], None).await?;
        result
            .as_i64()
            .ok_or_else(|| Error::KvProtocol(format!("incr returned non-integer: {result}")))
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), Error> {
        self.command(&["expire", key, &ttl_seconds.to_string()], None).await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, Error> {
        let result = self.command(&["keys", pattern], None).await?;
        let Value::Array(items) = result else {
            return Err(Error::KvProtocol(format!("keys returned non-array: {result}")));
        };
        Ok(items.into_iter().filter_map(result_string).collect())
    }
}

/// Stores answer scalars as strings; integer counters come back as numbers.
fn result_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
