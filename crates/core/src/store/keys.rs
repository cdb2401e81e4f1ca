//! Key construction and identifier generation.

use rand::Rng;

use crate::tool::Tool;

/// Retention of stored results and their lookup-index entries.
pub const RESULT_TTL_SECS: u64 = 90 * 24 * 60 * 60;

/// Retention of auxiliary info-cache entries.
pub const INFO_TTL_SECS: u64 = 24 * 60 * 60;

const HASH_LEN: usize = 8;
const HASH_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a fresh 8-character public identifier.
///
/// 36^8 values makes collisions overwhelmingly unlikely at this system's
/// write volume; no uniqueness check is performed.
pub fn short_hash() -> String {
    let mut rng = rand::rng();
    (0..HASH_LEN)
        .map(|_| HASH_ALPHABET[rng.random_range(0..HASH_ALPHABET.len())] as char)
        .collect()
}

pub fn result_key(tool: Tool, hash: &str) -> String {
    format!("result:{}:{}", tool.slug(), hash)
}

pub fn result_pattern(tool: Tool) -> String {
    format!("result:{}:*", tool.slug())
}

/// Canonical form of an unordered comparison pair: trimmed, lower-cased,
/// lexicographically sorted, joined. Exactly one key per pair.
pub fn canonical_pair(a: &str, b: &str) -> String {
    let mut pair = [a.trim().to_lowercase(), b.trim().to_lowercase()];
    pair.sort();
    pair.join("|")
}

pub fn compare_lookup_key(a: &str, b: &str) -> String {
    format!("compare:lookup:{}", canonical_pair(a, b))
}

/// Subject normalization for the info cache: lower-cased with whitespace
/// runs collapsed.
pub fn normalize_subject(subject: &str) -> String {
    subject.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn info_key(subject: &str, category: &str) -> String {
    format!("info:{}:{}", category.trim().to_lowercase(), normalize_subject(subject))
}
