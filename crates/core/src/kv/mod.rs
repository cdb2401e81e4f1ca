//! Key-value store contract.
//!
//! The remote store is the only shared mutable state in the system: quota
//! counters, stored results, and the dedup index all live behind this trait.
//! Implementations must serialize conflicting writes to the same key;
//! `incr` in particular is relied on to be atomic.
//!
//! Absence of a store is not represented here. Components hold an
//! `Option<Arc<dyn KvStore>>` and treat `None` as "feature disabled".

pub mod memory;

pub use memory::MemoryKv;

use crate::Error;
use async_trait::async_trait;

/// Minimal remote key-value operations with TTL support.
///
/// Every write in this system carries a TTL, so an un-expiring `set` is not
/// part of the contract; no explicit deletes occur either.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read a key. `None` when the key does not exist or has expired.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Write a key with a TTL in seconds.
    async fn set_ex(&self, key: &str, value: &str, ttl_seconds: u64) -> Result<(), Error>;

    /// Atomically increment an integer key, creating it at 1.
    async fn incr(&self, key: &str) -> Result<i64, Error>;

    /// Set the TTL of an existing key.
    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), Error>;

    /// Enumerate keys matching a glob pattern. Not a hot-path operation;
    /// ordering is whatever the store returns.
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, Error>;
}
