//! COA (certificate of analysis) checks.
//!
//! No caching here: documents are effectively unique, and the low quota
//! reflects how expensive the upstream analysis is.

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
pub struct CoaRequest {
    /// Extracted text of the certificate document.
    pub document: String,
    pub installation_id: String,
}

#[derive(Debug, Serialize)]
pub struct CoaResponse {
    pub analysis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaInfo>,
}

pub async fn analyze_coa(
    State(state): State<AppState>, Json(request): Json<CoaRequest>,
) -> Result<Json<CoaResponse>, ApiError> {
    if request.document.trim().is_empty() {
        return Err(ApiError::InvalidInput("document is required".into()));
    }

    let identity = Identity::Install(request.installation_id.clone());
    let decision = state.limiter.check_and_consume(&identity, QuotaClass::Coa).await?;
    if let RateDecision::Denied { limit } = decision {
        return Err(ApiError::RateLimited { limit });
    }

    let generator = state.generator.as_deref().ok_or(GenerateError::Unconfigured)?;
    let analysis = generator
        .generate("coa", &json!({ "document": request.document }))
        .await?;

    Ok(Json(CoaResponse { analysis, quota: quota_info(decision) }))
}
