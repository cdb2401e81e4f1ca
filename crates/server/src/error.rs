//! Structured errors for the leafkit HTTP surface.
//!
//! Quota denial and expired shared results are first-class states with
//! their own responses; they are never conflated with system failures.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::generator::GenerateError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The identity's quota for this class is exhausted.
    #[error("RATE_LIMITED: limit of {limit} requests per day reached")]
    RateLimited { limit: u32 },

    /// Path names a tool outside the fixed registry.
    #[error("UNKNOWN_TOOL: {0}")]
    UnknownTool(String),

    /// The shared result is past retention or never existed; the two cases
    /// are indistinguishable by design.
    #[error("RESULT_EXPIRED: {tool}")]
    ResultExpired { tool: &'static str },

    /// Request payload is missing or malformed.
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Upstream generation failed or is not configured.
    #[error("GENERATOR: {0}")]
    Generator(#[from] GenerateError),

    /// The key-value store failed mid-operation.
    #[error("STORE: {0}")]
    Store(#[from] leafkit_core::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UnknownTool(_) | ApiError::ResultExpired { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Generator(GenerateError::Unconfigured) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Generator(_) => StatusCode::BAD_GATEWAY,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::UnknownTool(_) => "unknown_tool",
            ApiError::ResultExpired { .. } => "result_expired",
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Generator(_) => "generator_failed",
            ApiError::Store(_) => "store_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::RateLimited { limit } => json!({
                "error": self.code(),
                "limit": limit,
                "message": "Daily limit reached. Come back later, or unlock more with a membership.",
            }),
            ApiError::ResultExpired { tool } => json!({
                "error": self.code(),
                "tool": tool,
                "message": format!("This shared result has expired or does not exist. Try the live {tool} instead."),
            }),
            other => json!({
                "error": other.code(),
                "message": other.to_string(),
            }),
        };

        if matches!(self.status(), StatusCode::INTERNAL_SERVER_ERROR | StatusCode::BAD_GATEWAY) {
            tracing::error!(error = %self, "request failed");
        }

        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::RateLimited { limit: 10 }.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(ApiError::UnknownTool("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::ResultExpired { tool: "Strain Compare" }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::InvalidInput("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Generator(GenerateError::Unconfigured).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Generator(GenerateError::Status(500)).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_rate_limited_is_not_a_failure_code() {
        let err = ApiError::RateLimited { limit: 10 };
        assert_eq!(err.code(), "rate_limited");
        assert!(err.status().is_client_error());
    }
}
