//! Tool invocation: the usage-gated, deduplicated generation path.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use leafkit_core::{NewResult, QuotaClass, RateDecision, ResultMeta, Tool};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{QuotaInfo, quota_info};
use crate::error::ApiError;
use crate::generator::GenerateError;
use crate::identity::client_identity;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunToolRequest {
    /// Tool-specific arguments, passed through to the generator opaquely.
    #[serde(default)]
    pub input: Value,
}

#[derive(Debug, Serialize)]
pub struct RunToolResponse {
    pub output: String,
    /// Public identifier for sharing; absent when persistence is
    /// unavailable (the result is still delivered).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Whether the response was served from the dedup index.
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<QuotaInfo>,
}

pub async fn run_tool(
    State(state): State<AppState>, Path(slug): Path<String>, headers: HeaderMap,
    Json(request): Json<RunToolRequest>,
) -> Result<Json<RunToolResponse>, ApiError> {
    let tool = Tool::from_slug(&slug).ok_or(ApiError::UnknownTool(slug))?;
    let identity = client_identity(&headers, &state.config.subscriber_cookie);

    let decision = state
        .limiter
        .check_and_consume(&identity, QuotaClass::GeneralTool)
        .await?;
    if let RateDecision::Denied { limit } = decision {
        return Err(ApiError::RateLimited { limit });
    }

    run_gated(&state, tool, request.input, decision).await.map(Json)
}

/// The post-quota path: dedup lookup, generation, persistence.
async fn run_gated(
    state: &AppState, tool: Tool, input: Value, decision: RateDecision,
) -> Result<RunToolResponse, ApiError> {
    let quota = quota_info(decision);

    if tool == Tool::StrainCompare {
        let (arg_a, arg_b) = compare_args(&input)?;
        if let Some((hash, existing)) = find_comparison(state, &arg_a, &arg_b).await {
            tracing::debug!(hash = %hash, "serving deduplicated comparison");
            return Ok(RunToolResponse { output: existing.output, hash: Some(hash), cached: true, quota });
        }

        let output = generate(state, tool.slug(), &input).await?;
        let new = NewResult { tool, input: input.clone(), output: output.clone(), meta: compare_meta(&arg_a, &arg_b) };
        let hash = persist(state.results.store_comparison(&arg_a, &arg_b, new).await);
        return Ok(RunToolResponse { output, hash, cached: false, quota });
    }

    let output = generate(state, tool.slug(), &input).await?;
    let new = NewResult { tool, input, output: output.clone(), meta: tool_meta(tool) };
    let hash = persist(state.results.store(new).await);
    Ok(RunToolResponse { output, hash, cached: false, quota })
}

async fn generate(state: &AppState, kind: &str, input: &Value) -> Result<String, ApiError> {
    let generator = state.generator.as_deref().ok_or(GenerateError::Unconfigured)?;
    Ok(generator.generate(kind, input).await?)
}

/// A failed index lookup degrades to a cache miss, never a failed request.
async fn find_comparison(
    state: &AppState, arg_a: &str, arg_b: &str,
) -> Option<(String, leafkit_core::StoredResult)> {
    match state.results.find_existing_comparison(arg_a, arg_b).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e, "comparison lookup failed; regenerating");
            None
        }
    }
}

/// A failed write degrades to "shown but not shareable".
fn persist(stored: Result<Option<String>, leafkit_core::Error>) -> Option<String> {
    match stored {
        Ok(hash) => hash,
        Err(e) => {
            tracing::warn!(error = %e, "failed to persist result; response is not shareable");
            None
        }
    }
}

fn compare_args(input: &Value) -> Result<(String, String), ApiError> {
    let arg = |name: &str| {
        input
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    match (arg("strain_a"), arg("strain_b")) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(ApiError::InvalidInput("strain_a and strain_b are required".into())),
    }
}

fn compare_meta(arg_a: &str, arg_b: &str) -> ResultMeta {
    ResultMeta {
        title: format!("{arg_a} vs {arg_b}"),
        description: format!("Side-by-side comparison of {arg_a} and {arg_b}."),
        share_text: format!("See how {arg_a} and {arg_b} stack up"),
    }
}

fn tool_meta(tool: Tool) -> ResultMeta {
    ResultMeta {
        title: tool.display_name().to_string(),
        description: format!("{} result", tool.display_name()),
        share_text: format!("My {} result", tool.display_name()),
    }
}
