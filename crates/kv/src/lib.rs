//! Remote key-value store adapter for leafkit.
//!
//! This crate provides the `KvStore` implementation that talks to an
//! Upstash-style REST endpoint. Everything else in the system depends only
//! on the trait from `leafkit-core`.

pub mod rest;

pub use rest::RestKv;
