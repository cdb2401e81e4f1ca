//! Unified error types for leafkit.
//!
//! An absent (unconfigured) key-value store is not an error anywhere in this
//! crate: components model it as a disabled feature. These variants cover
//! actual failures of a configured store and local encoding problems.

/// Unified error types for the leafkit core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network-level failure talking to the key-value store.
    #[error("KV_NETWORK: {0}")]
    KvNetwork(String),

    /// The key-value store answered with a non-success HTTP status.
    #[error("KV_STATUS: store returned HTTP {0}")]
    KvStatus(u16),

    /// The store answered, but not in the shape the protocol promises.
    #[error("KV_PROTOCOL: {0}")]
    KvProtocol(String),

    /// Local serialization failed before a write could be issued.
    #[error("ENCODE: {0}")]
    Encode(#[from] serde_json::Error),
}
