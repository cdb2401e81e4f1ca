//! Shared-result lookup: `/api/tools/{slug}/r/{hash}`.

use axum::Json;
use axum::extract::{Path, State};
use leafkit_core::{StoredResult, Tool};

use crate::error::ApiError;
use crate::state::AppState;

/// Resolve a public identifier to its stored result.
///
/// Expired, never stored, and store-unavailable all surface as the same
/// "expired" state; the page layer links back to the live tool.
pub async fn fetch_shared(
    State(state): State<AppState>, Path((slug, hash)): Path<(String, String)>,
) -> Result<Json<StoredResult>, ApiError> {
    let tool = Tool::from_slug(&slug).ok_or(ApiError::UnknownTool(slug))?;

    state
        .results
        .fetch(tool, &hash)
        .await?
        .map(Json)
        .ok_or(ApiError::ResultExpired { tool: tool.display_name() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testutil::{state_with_store, state_without_store};
    use leafkit_core::{NewResult, ResultMeta};
    use serde_json::json;

    fn sample(tool: Tool) -> NewResult {
        NewResult {
            tool,
            input: json!({"weeks": 4}),
            output: "Week-by-week plan".into(),
            meta: ResultMeta {
                title: "Tolerance plan".into(),
                description: "A 4-week plan".into(),
                share_text: "My plan".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_fetch_stored_result() {
        let (_clock, state) = state_with_store();
        let hash = state
            .results
            .store(sample(Tool::ToleranceBreakPlanner))
            .await
            .unwrap()
            .unwrap();

        let Json(result) = fetch_shared(
            State(state.clone()),
            Path(("tolerance-break-planner".to_string(), hash.clone())),
        )
        .await
        .unwrap();

        assert_eq!(result.hash, hash);
        assert_eq!(result.output, "Week-by-week plan");
    }

    #[tokio::test]
    async fn test_missing_result_names_the_tool() {
        let (_clock, state) = state_with_store();
        let err = fetch_shared(
            State(state),
            Path(("strain-compare".to_string(), "zzzz9999".to_string())),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::ResultExpired { tool: "Strain Compare" }));
    }

    #[tokio::test]
    async fn test_wrong_tool_segment_misses() {
        let (_clock, state) = state_with_store();
        let hash = state.results.store(sample(Tool::GrowTimeline)).await.unwrap().unwrap();

        let err = fetch_shared(State(state), Path(("terpene-guide".to_string(), hash)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ResultExpired { .. }));
    }

    #[tokio::test]
    async fn test_unavailable_store_reads_as_expired() {
        let state = state_without_store();
        let err = fetch_shared(
            State(state),
            Path(("strain-compare".to_string(), "ab12cd34".to_string())),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::ResultExpired { .. }));
    }
}
