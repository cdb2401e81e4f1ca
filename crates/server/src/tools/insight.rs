//! Strain insight lookups, gated by installation id and cached for a day.

use axum::Json;
use axum::extract::State;
use leafkit_core::{Identity, QuotaClass, RateDecision};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{QuotaInfo, quota_info};
use crate::error::ApiError;
use crate::generator::GenerateError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    pub subject: String,
    pub category: String,
    pub installation_id: String,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub payload: String,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaInfo>,
}

pub async fn lookup_insight(
    State(state): State<AppState>, Json(request): Json<InsightRequest>,
) -> Result<Json<InsightResponse>, ApiError> {
    if request.subject.trim().is_empty() || request.category.trim().is_empty() {
        return Err(ApiError::InvalidInput("subject and category are required".into()));
    }

    let identity = Identity::Install(request.installation_id.clone());
    let decision = state.limiter.check_and_consume(&identity, QuotaClass::Insight).await?;
    if let RateDecision::Denied { limit } = decision {
        return Err(ApiError::RateLimited { limit });
    }
    let quota = quota_info(decision);

    // Read-through: a cache failure is just a miss.
    match state.info.get(&request.subject, &request.category).await {
        Ok(Some(payload)) => return Ok(Json(InsightResponse { payload, cached: true, quota })),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "info cache read failed; regenerating"),
    }

    let generator = state.generator.as_deref().ok_or(GenerateError::Unconfigured)?;
    let payload = generator
        .generate("insight", &json!({ "subject": request.subject, "category": request.category }))
        .await?;

    if let Err(e) = state.info.put(&request.subject, &request.category, &payload).await {
        tracing::warn!(error = %e, "info cache write failed");
    }

    Ok(Json(InsightResponse { payload, cached: false, quota }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testutil::{state_with_store, state_without_store};

    async fn call(state: &AppState, subject: &str, install: &str) -> Result<InsightResponse, ApiError> {
        lookup_insight(
            State(state.clone()),
            Json(InsightRequest {
                subject: subject.to_string(),
                category: "terpenes".to_string(),
                installation_id: install.to_string(),
            }),
        )
        .await
        .map(|Json(response)| response)
    }

    #[tokio::test]
    async fn test_generates_then_serves_cached() {
        let (_clock, state) = state_with_store();

        let first = call(&state, "Blue Dream", "device_1").await.unwrap();
        assert!(!first.cached);
        assert_eq!(first.payload, "generated output");

        let second = call(&state, "blue  dream", "device_1").await.unwrap();
        assert!(second.cached);
        assert_eq!(second.payload, first.payload);
    }

    #[tokio::test]
    async fn test_cache_expires_after_a_day() {
        let (clock, state) = state_with_store();
        call(&state, "Blue Dream", "device_1").await.unwrap();

        clock.advance(24 * 60 * 60 * 1000 + 1);
        let again = call(&state, "Blue Dream", "device_1").await.unwrap();
        assert!(!again.cached);
    }

    #[tokio::test]
    async fn test_installation_quota_enforced() {
        let (_clock, state) = state_with_store();

        // Distinct subjects keep every call a cache miss.
        for i in 0..50 {
            let subject = format!("strain {i}");
            let response = call(&state, &subject, "device_1").await.unwrap();
            assert!(!response.cached);
        }

        let err = call(&state, "one more", "device_1").await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { limit: 50 }));

        // A different installation is unaffected.
        assert!(call(&state, "other", "device_2").await.is_ok());
    }

    #[tokio::test]
    async fn test_sanitized_install_ids_share_a_counter() {
        let (_clock, state) = state_with_store();

        for i in 0..50 {
            call(&state, &format!("strain {i}"), "abc;DROP").await.unwrap();
        }

        // Same identity after sanitization.
        let err = call(&state, "final", "abcDROP").await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_empty_subject_rejected() {
        let (_clock, state) = state_with_store();
        let err = call(&state, "  ", "device_1").await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_without_store_always_generates() {
        let state = state_without_store();
        for _ in 0..60 {
            let response = call(&state, "Blue Dream", "device_1").await.unwrap();
            assert!(!response.cached);
            assert!(response.quota.is_none());
        }
    }
}
