//! Content-addressed persistence of computed tool results.
//!
//! Results are written once under a short public identifier, expire after a
//! fixed 90-day retention window via the store's TTL, and are never
//! explicitly deleted. Comparison-style tools additionally maintain a
//! canonical-pair lookup index so `A vs B` and `B vs A` resolve to one
//! stored result.

mod compare;
mod info;
pub mod keys;
mod results;

pub use info::InfoCache;
pub use results::{NewResult, ResultMeta, ResultStore, StoredResult};
