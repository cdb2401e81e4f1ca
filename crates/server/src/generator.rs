//! The upstream result generator seam.
//!
//! Generation is an opaque external call: this module defines the trait the
//! handlers depend on and a thin REST client for the configured endpoint.
//! Prompt construction happens upstream, not here.

use std::time::Duration;

use async_trait::async_trait;
use leafkit_core::AppConfig;
use serde::Deserialize;
use serde_json::{Value, json};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("generator endpoint is not configured")]
    Unconfigured,

    #[error("generator request failed: {0}")]
    Network(String),

    #[error("generator returned HTTP {0}")]
    Status(u16),

    #[error("generator response was malformed: {0}")]
    Parse(String),
}

/// Opaque `GenerateResult(input) -> output` supplied by an external provider.
///
/// `kind` is the tool slug or an internal task name (`insight`, `coa`).
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, kind: &str, input: &Value) -> Result<String, GenerateError>;
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    output: String,
}

/// Client for the configured generation endpoint.
#[derive(Debug, Clone)]
pub struct RestGenerator {
    http: reqwest::Client,
    url: String,
}

impl RestGenerator {
    pub fn new(url: &str) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| GenerateError::Network(e.to_string()))?;
        Ok(Self { http, url: url.to_string() })
    }

    /// `Ok(None)` when no endpoint is configured; tool handlers surface that
    /// at call time.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>, GenerateError> {
        match config.generator_url.as_deref() {
            Some(url) => Ok(Some(Self::new(url)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Generator for RestGenerator {
    async fn generate(&self, kind: &str, input: &Value) -> Result<String, GenerateError> {
        tracing::debug!(kind, "calling upstream generator");

        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "kind": kind, "input": input }))
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::Status(status.as_u16()));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Parse(e.to_string()))?;

        Ok(body.output)
    }
}
