//! Core types and shared functionality for leafkit.
//!
//! This crate provides:
//! - The `KvStore` trait plus an in-memory fake for tests
//! - Sliding-window rate limiting with tiered quotas
//! - Content-addressed result storage with a comparison dedup index
//! - Unified error types and configuration structures

pub mod clock;
pub mod config;
pub mod error;
pub mod kv;
pub mod quota;
pub mod rate_limit;
pub mod store;
pub mod tool;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::AppConfig;
pub use error::Error;
pub use kv::{KvStore, MemoryKv};
pub use quota::{Identity, QuotaClass, Tier};
pub use rate_limit::{RateDecision, RateLimiter};
pub use store::{InfoCache, NewResult, ResultMeta, ResultStore, StoredResult};
pub use tool::Tool;
