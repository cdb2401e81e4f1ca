//! Auxiliary info cache.
//!
//! Pure compute-avoidance for per-subject lookups (e.g. strain insight by
//! category). Entries are keyed by the normalized subject plus category,
//! live 24 hours, and never get a public identifier.

use std::sync::Arc;

use super::keys;
use crate::{Error, KvStore};

/// 24-hour read-through cache keyed by subject + category.
#[derive(Clone)]
pub struct InfoCache {
    kv: Option<Arc<dyn KvStore>>,
}

impl InfoCache {
    pub fn new(kv: Option<Arc<dyn KvStore>>) -> Self {
        Self { kv }
    }

    /// Cached payload for the subject/category, if present and fresh.
    pub async fn get(&self, subject: &str, category: &str) -> Result<Option<String>, Error> {
        let Some(kv) = &self.kv else {
            return Ok(None);
        };
        kv.get(&keys::info_key(subject, category)).await
    }

    /// Cache a payload for 24 hours. No-op without a store.
    pub async fn put(&self, subject: &str, category: &str, payload: &str) -> Result<(), Error> {
        let Some(kv) = &self.kv else {
            return Ok(());
        };
        kv.set_ex(&keys::info_key(subject, category), payload, keys::INFO_TTL_SECS)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::kv::MemoryKv;

    fn cache() -> (Arc<ManualClock>, InfoCache) {
        let clock = Arc::new(ManualClock::new(0));
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new(clock.clone()));
        (clock, InfoCache::new(Some(kv)))
    }

    #[tokio::test]
    async fn test_put_and_get_normalizes_subject() {
        let (_clock, cache) = cache();
        cache.put("Blue  Dream", "terpenes", "{\"myrcene\":true}").await.unwrap();

        let hit = cache.get("  blue dream ", "terpenes").await.unwrap();
        assert_eq!(hit.as_deref(), Some("{\"myrcene\":true}"));
    }

    #[tokio::test]
    async fn test_categories_are_separate() {
        let (_clock, cache) = cache();
        cache.put("Blue Dream", "terpenes", "t").await.unwrap();

        assert!(cache.get("Blue Dream", "effects").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entries_expire_after_a_day() {
        let (clock, cache) = cache();
        cache.put("Blue Dream", "terpenes", "t").await.unwrap();

        clock.advance(24 * 60 * 60 * 1000 + 1);
        assert!(cache.get("Blue Dream", "terpenes").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unconfigured_is_a_noop() {
        let cache = InfoCache::new(None);
        cache.put("Blue Dream", "terpenes", "t").await.unwrap();
        assert!(cache.get("Blue Dream", "terpenes").await.unwrap().is_none());
    }
}
