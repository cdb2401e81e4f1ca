//! Store and fetch operations for shareable results.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::keys;
use crate::clock::Clock;
use crate::tool::Tool;
use crate::{Error, KvStore};

/// Display metadata for a shared result link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultMeta {
    pub title: String,
    pub description: String,
    pub share_text: String,
}

/// One completed tool computation, as persisted.
///
/// Immutable after write; expires with the key's TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResult {
    pub tool: Tool,
    pub input: serde_json::Value,
    pub output: String,
    pub created_at: DateTime<Utc>,
    pub meta: ResultMeta,
    pub hash: String,
}

/// A result about to be persisted; `hash` and `created_at` are assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewResult {
    pub tool: Tool,
    pub input: serde_json::Value,
    pub output: String,
    pub meta: ResultMeta,
}

/// Content-addressed result persistence over the key-value store.
///
/// Persisted results are cached artifacts, not the source of truth: with no
/// store configured every operation degrades to a miss or no-op.
#[derive(Clone)]
pub struct ResultStore {
    pub(super) kv: Option<Arc<dyn KvStore>>,
    clock: Arc<dyn Clock>,
}

impl ResultStore {
    pub fn new(kv: Option<Arc<dyn KvStore>>, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    /// Persist a result under a fresh public identifier.
    ///
    /// Returns `None` when the store is unavailable: the result is still
    /// deliverable to the requester, just not shareable.
    pub async fn store(&self, new: NewResult) -> Result<Option<String>, Error> {
        let Some(kv) = &self.kv else {
            return Ok(None);
        };

        let hash = keys::short_hash();
        let created_at = DateTime::from_timestamp_millis(self.clock.now_ms()).unwrap_or_else(Utc::now);
        let result = StoredResult {
            tool: new.tool,
            input: new.input,
            output: new.output,
            created_at,
            meta: new.meta,
            hash: hash.clone(),
        };

        let json = serde_json::to_string(&result)?;
        kv.set_ex(&keys::result_key(result.tool, &hash), &json, keys::RESULT_TTL_SECS)
            .await?;

        tracing::debug!(tool = result.tool.slug(), hash = %hash, "stored result");
        Ok(Some(hash))
    }

    /// Look up a result by its public identifier.
    ///
    /// "Never existed", "expired", and "store unavailable" are deliberately
    /// indistinguishable: all come back as `None`. Corrupt entries are
    /// skipped, not surfaced.
    pub async fn fetch(&self, tool: Tool, hash: &str) -> Result<Option<StoredResult>, Error> {
        let Some(kv) = &self.kv else {
            return Ok(None);
        };

        let Some(json) = kv.get(&keys::result_key(tool, hash)).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(result) => Ok(Some(result)),
            Err(e) => {
                tracing::debug!(tool = tool.slug(), hash, error = %e, "skipping malformed stored result");
                Ok(None)
            }
        }
    }

    /// Enumerate up to `limit` persisted identifiers for a tool.
    ///
    /// Unordered; consumers must not assume chronology.
    pub async fn list_hashes(&self, tool: Tool, limit: usize) -> Result<Vec<String>, Error> {
        let Some(kv) = &self.kv else {
            return Ok(Vec::new());
        };

        let mut hashes: Vec<String> = kv
            .keys(&keys::result_pattern(tool))
            .await?
            .iter()
            .filter_map(|key| key.rsplit(':').next().map(str::to_string))
            .collect();
        hashes.truncate(limit);
        Ok(hashes)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::kv::MemoryKv;
    use crate::store::keys::RESULT_TTL_SECS;

    pub(crate) fn sample(tool: Tool) -> NewResult {
        NewResult {
            tool,
            input: serde_json::json!({"mood": "relaxed", "experience": "beginner"}),
            output: "Try Northern Lights.".into(),
            meta: ResultMeta {
                title: "Strain picks for a relaxed evening".into(),
                description: "Personalized strain recommendation".into(),
                share_text: "My strain matches".into(),
            },
        }
    }

    fn store_with_clock() -> (Arc<ManualClock>, ResultStore) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new(clock.clone()));
        (clock.clone(), ResultStore::new(Some(kv), clock))
    }

    #[tokio::test]
    async fn test_store_then_fetch_roundtrip() {
        let (_clock, store) = store_with_clock();
        let new = sample(Tool::StrainRecommender);

        let hash = store.store(new.clone()).await.unwrap().unwrap();
        assert_eq!(hash.len(), 8);

        let fetched = store.fetch(Tool::StrainRecommender, &hash).await.unwrap().unwrap();
        assert_eq!(fetched.tool, new.tool);
        assert_eq!(fetched.input, new.input);
        assert_eq!(fetched.output, new.output);
        assert_eq!(fetched.meta, new.meta);
        assert_eq!(fetched.hash, hash);
        assert_eq!(fetched.created_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[tokio::test]
    async fn test_fetch_never_stored() {
        let (_clock, store) = store_with_clock();
        let fetched = store.fetch(Tool::TerpeneGuide, "zzzz9999").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_fetch_after_retention_window() {
        let (clock, store) = store_with_clock();
        let hash = store.store(sample(Tool::GrowTimeline)).await.unwrap().unwrap();

        clock.advance(RESULT_TTL_SECS as i64 * 1000 + 1);

        // Indistinguishable from a hash that never existed.
        let fetched = store.fetch(Tool::GrowTimeline, &hash).await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_fetch_malformed_payload_is_absent() {
        let (clock, store) = store_with_clock();
        let kv = MemoryKv::new(clock.clone());
        kv.set_ex("result:cbd-vs-thc:bad00000", "{not json", 60).await.unwrap();
        let store = ResultStore::new(Some(Arc::new(kv)), clock);

        let fetched = store.fetch(Tool::CbdVsThc, "bad00000").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn test_list_hashes_caps_at_limit() {
        let (_clock, store) = store_with_clock();
        for _ in 0..7 {
            store.store(sample(Tool::StrainCompare)).await.unwrap();
        }

        let all = store.list_hashes(Tool::StrainCompare, 1000).await.unwrap();
        assert_eq!(all.len(), 7);

        let capped = store.list_hashes(Tool::StrainCompare, 3).await.unwrap();
        assert_eq!(capped.len(), 3);
    }

    #[tokio::test]
    async fn test_list_hashes_scoped_to_tool() {
        let (_clock, store) = store_with_clock();
        let hash = store.store(sample(Tool::TerpeneGuide)).await.unwrap().unwrap();
        store.store(sample(Tool::GrowTimeline)).await.unwrap();

        let listed = store.list_hashes(Tool::TerpeneGuide, 1000).await.unwrap();
        assert_eq!(listed, vec![hash]);
    }

    #[tokio::test]
    async fn test_unconfigured_store_is_a_noop() {
        let clock = Arc::new(ManualClock::new(0));
        let store = ResultStore::new(None, clock);

        assert!(store.store(sample(Tool::StrainRecommender)).await.unwrap().is_none());
        assert!(store.fetch(Tool::StrainRecommender, "ab12cd34").await.unwrap().is_none());
        assert!(store.list_hashes(Tool::StrainRecommender, 1000).await.unwrap().is_empty());
    }
}
