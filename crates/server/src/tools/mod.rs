//! HTTP surface: tool invocation, shared-result lookup, gated extensions.
//!
//! Control flow for every generating endpoint is the same: rate limit
//! first, then a cache/dedup lookup, then the upstream generator, then
//! persistence. Persistence failures degrade the response (not shareable)
//! rather than failing it.

pub mod coa;
pub mod insight;
pub mod run;
pub mod share;

use axum::Router;
use axum::routing::{get, post};
use leafkit_core::RateDecision;
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::sitemap;
use crate::state::AppState;

/// Quota state echoed back to the client on allowed requests.
///
/// Absent when the limiter is disabled (no store configured).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaInfo {
    pub limit: u32,
    pub remaining: u32,
}

pub(crate) fn quota_info(decision: RateDecision) -> Option<QuotaInfo> {
    match decision {
        RateDecision::Allowed { limit, remaining } => Some(QuotaInfo { limit, remaining }),
        RateDecision::Disabled | RateDecision::Denied { .. } => None,
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/tools/{slug}", post(run::run_tool))
        .route("/api/tools/{slug}/r/{hash}", get(share::fetch_shared))
        .route("/api/insight", post(insight::lookup_insight))
        .route("/api/coa", post(coa::analyze_coa))
        .route("/sitemap.xml", get(sitemap::serve_sitemap))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
