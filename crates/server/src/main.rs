//! leafkit server entry point.
//!
//! Boots the HTTP surface for the usage-gated result cache. A deployment
//! without key-value store credentials runs fail-open: no rate limiting,
//! no persistence, tools still answer.

use std::sync::Arc;

use anyhow::Result;
use leafkit_core::{AppConfig, Clock, KvStore, SystemClock};
use leafkit_kv::RestKv;
use tracing_subscriber::EnvFilter;

mod error;
mod generator;
mod identity;
mod sitemap;
mod state;
mod tools;

use generator::{Generator, RestGenerator};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::load()?;
    let listen_addr = config.listen_addr.clone();

    let kv = RestKv::from_config(&config)?.map(|kv| Arc::new(kv) as Arc<dyn KvStore>);
    if kv.is_none() {
        tracing::warn!("key-value store not configured; rate limiting and result persistence are disabled");
    }

    let generator = RestGenerator::from_config(&config)?.map(|g| Arc::new(g) as Arc<dyn Generator>);
    if generator.is_none() {
        tracing::warn!("generator endpoint not configured; tool invocations will be rejected");
    }

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let app = tools::router(AppState::new(config, kv, generator, clock));

    tracing::info!(addr = %listen_addr, "leafkit listening");
    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
