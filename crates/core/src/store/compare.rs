//! Comparison dedup index.
//!
//! The upstream generation call is the dominant cost, and a comparison's
//! argument pair is commutative, so canonicalizing order collapses `A,B`
//! and `B,A` into one cache entry.

use super::keys;
use crate::tool::Tool;
use crate::{Error, ResultStore, StoredResult};

use super::results::NewResult;

impl ResultStore {
    /// Resolve an existing result for the unordered pair, if any.
    ///
    /// Canonicalization is case-insensitive; absent if the index entry, the
    /// pointed-to result, or the store itself is missing.
    pub async fn find_existing_comparison(
        &self, arg_a: &str, arg_b: &str,
    ) -> Result<Option<(String, StoredResult)>, Error> {
        let Some(kv) = &self.kv else {
            return Ok(None);
        };

        let Some(hash) = kv.get(&keys::compare_lookup_key(arg_a, arg_b)).await? else {
            return Ok(None);
        };

        Ok(self.fetch(Tool::StrainCompare, &hash).await?.map(|result| (hash, result)))
    }

    /// Persist a comparison result and point the pair's index entry at it.
    ///
    /// The index write happens only if storage succeeded, and overwrites any
    /// earlier pointer for the pair (last write wins). The entry shares the
    /// result's 90-day retention; a pointer whose result is gone reads as a
    /// miss and the next invocation regenerates.
    pub async fn store_comparison(
        &self, arg_a: &str, arg_b: &str, new: NewResult,
    ) -> Result<Option<String>, Error> {
        let Some(hash) = self.store(new).await? else {
            return Ok(None);
        };

        if let Some(kv) = &self.kv {
            kv.set_ex(&keys::compare_lookup_key(arg_a, arg_b), &hash, keys::RESULT_TTL_SECS)
                .await?;
        }

        Ok(Some(hash))
    }
}
