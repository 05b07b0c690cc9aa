mod app;
mod config;
mod errors;
mod form;
mod handlers;
mod middleware;
mod models;
mod services;

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use crate::{
    app::AppState,
    config::Config,
    services::{InMemoryStore, KeyValueStore, RedisService},
};

fn durable_store(config: &Config) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    if !config.redis.enabled {
        tracing::warn!("Redis disabled, users are kept in memory only");
        return Ok(Arc::new(InMemoryStore::new()));
    }

    let url = if config.redis.sentinel_enabled {
        config
            .redis
            .sentinel_url
            .clone()
            .context("Sentinel URL not configured")?
    } else {
        config.redis.url.clone()
    };
    let client = redis::Client::open(url).context("Failed to open Redis client")?;

    Ok(Arc::new(RedisService::new(
        Arc::new(client),
        config.redis.namespace.clone(),
    )))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load().context("Failed to load configuration")?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let durable = durable_store(&config)?;
    let app = app::build_router(AppState::new(durable, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("Server error")?;

    Ok(())
}
