//! Sliding-window rate limiting over the key-value store.
//!
//! Counters live in fixed 24h buckets; the effective count weights the
//! previous bucket by how much of it still falls inside the trailing window,
//! so allowance decays continuously instead of resetting at a boundary.
//! Atomicity comes from the store's `incr`; no client-side locking.
//!
//! When the store is not provisioned the limiter reports `Disabled` and
//! callers treat every request as allowed. This fail-open policy favors
//! availability over strict enforcement.

use std::sync::Arc;

use crate::clock::Clock;
use crate::quota::{Identity, QuotaClass};
use crate::{Error, KvStore};

/// Outcome of a quota check.
///
/// `Disabled` is distinct from `Allowed` so callers can tell "no quota
/// enforced" apart from "quota consumed", and denial is a first-class state,
/// never a system failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// No store configured; the request proceeds unmetered.
    Disabled,
    Allowed { limit: u32, remaining: u32 },
    Denied { limit: u32 },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, RateDecision::Denied { .. })
    }
}

/// Sliding-window quota tracker keyed by identity + quota class.
#[derive(Clone)]
pub struct RateLimiter {
    kv: Option<Arc<dyn KvStore>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(kv: Option<Arc<dyn KvStore>>, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    /// Check the identity's quota and, if allowed, durably consume one unit.
    ///
    /// Denied calls never increment, so a denial does not extend itself.
    /// Store failures propagate; the call site decides what a failed check
    /// means for the request.
    pub async fn check_and_consume(
        &self, identity: &Identity, class: QuotaClass,
    ) -> Result<RateDecision, Error> {
        let Some(kv) = &self.kv else {
            return Ok(RateDecision::Disabled);
        };

        let limit = class.limit_for(identity.tier());
        let window_ms = class.window_secs() as i64 * 1000;
        let now = self.clock.now_ms();
        let bucket = now.div_euclid(window_ms);
        let fragment = identity.key_fragment();

        let current_key = bucket_key(class, &fragment, bucket);
        let previous_key = bucket_key(class, &fragment, bucket - 1);

        let previous = read_count(kv.as_ref(), &previous_key).await?;
        let current = read_count(kv.as_ref(), &current_key).await?;

        // Fraction of the current bucket already elapsed; the previous
        // bucket's requests count at the complementary weight.
        let elapsed = now.rem_euclid(window_ms) as f64 / window_ms as f64;
        let weighted = previous as f64 * (1.0 - elapsed) + current as f64;
        let used = weighted.ceil() as u32;

        if used >= limit {
            tracing::debug!(class = class.prefix(), identity = %fragment, limit, "rate limit exceeded");
            return Ok(RateDecision::Denied { limit });
        }

        let total = kv.incr(&current_key).await?;
        if total == 1 {
            // Keep the bucket around long enough to serve as "previous".
            kv.expire(&current_key, class.window_secs() * 2).await?;
        }

        Ok(RateDecision::Allowed { limit, remaining: limit - used - 1 })
    }
}

fn bucket_key(class: QuotaClass, fragment: &str, bucket: i64) -> String {
    format!("ratelimit:{}:{}:{}", class.prefix(), fragment, bucket)
}

async fn read_count(kv: &dyn KvStore, key: &str) -> Result<u64, Error> {
    Ok(kv.get(key).await?.and_then(|v| v.parse().ok()).unwrap_or(0))
}
