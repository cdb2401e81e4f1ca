//! Shared application state.
//!
//! There is no in-process mutable state: every component here coordinates
//! through the (optional) remote key-value store, so the state is cheap to
//! clone per request.

use std::sync::Arc;

use leafkit_core::{AppConfig, Clock, InfoCache, KvStore, RateLimiter, ResultStore};

use crate::generator::Generator;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub limiter: RateLimiter,
    pub results: ResultStore,
    pub info: InfoCache,
    /// Absent until the upstream generator endpoint is configured; tool
    /// invocations fail with a distinct error, everything else still works.
    pub generator: Option<Arc<dyn Generator>>,
}

impl AppState {
    pub fn new(
        config: AppConfig, kv: Option<Arc<dyn KvStore>>, generator: Option<Arc<dyn Generator>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            limiter: RateLimiter::new(kv.clone(), clock.clone()),
            results: ResultStore::new(kv.clone(), clock),
            info: InfoCache::new(kv),
            generator,
        }
    }
}
