//! In-memory `KvStore` used in tests and local development.
//!
//! TTL expiry is evaluated lazily against an injected clock, so tests can
//! advance time with a `ManualClock` instead of sleeping.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::{Error, KvStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at_ms: Option<i64>,
}

/// Clock-driven in-memory key-value store.
pub struct MemoryKv {
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryKv {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, entries: Mutex::new(HashMap::new()) }
    }

    fn is_expired(&self, entry: &Entry) -> bool {
        entry.expires_at_ms.is_some_and(|at| at <= self.clock.now_ms())
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let mut entries = self.entries.lock().await;
        let expired = entries.get(key).is_some_and(|entry| self.is_expired(entry));
        if expired {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), Error> {
        let expires_at_ms = Some(self.clock.now_ms() + ttl_seconds as i64 * 1000);
        self.entries
            .lock()
            .await
            .insert(key.to_string(), Entry { value: value.to_string(), expires_at_ms });
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, Error> {
        let mut entries = self.entries.lock().await;
        let live = entries.get(key).filter(|e| !self.is_expired(e));
        let next = match live {
            Some(entry) => {
                let current: i64 = entry
                    .value
                    .parse()
                    .map_err(|_| Error::KvProtocol("value is not an integer or out of range".into()))?;
                current + 1
            }
            None => 1,
        };
        let expires_at_ms = live.and_then(|e| e.expires_at_ms);
        entries.insert(key.to_string(), Entry { value: next.to_string(), expires_at_ms });
        Ok(next)
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), Error> {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.expires_at_ms = Some(now + ttl_seconds as i64 * 1000);
        }
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, Error> {
        let entries = self.entries.lock().await;
        Ok(entries
            .iter()
            .filter(|(key, entry)| !self.is_expired(entry) && glob_match(pattern.as_bytes(), key.as_bytes()))
            .map(|(key, _)| key.clone())
            .collect())
    }
}

/// Redis-style glob where `*` matches any run of characters.
fn glob_match(pattern: &[u8], key: &[u8]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((b'*', rest)) => (0..=key.len()).any(|i| glob_match(rest, &key[i..])),
        Some((c, rest)) => key.first() == Some(c) && glob_match(rest, &key[1..]),
    }
}
