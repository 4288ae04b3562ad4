//! Bookshelf server entry point.
//!
//! All operations are exposed via GraphQL at /graphql.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookshelf::Config;
use bookshelf::services::{
    GraphqlServiceConfig, HttpServerConfig, PubSub, ServicesManager, TickerConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookshelf=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Bookshelf server");

    let config = Arc::new(Config::from_env()?);
    tracing::info!("Configuration loaded");

    let services = ServicesManager::builder()
        .with_pubsub(Arc::new(PubSub::new(config.pubsub_capacity)))
        .add_service(TickerConfig::from(&*config))
        .add_service(GraphqlServiceConfig {
            config: config.clone(),
        })
        .add_service(HttpServerConfig {
            config: config.clone(),
        })
        .start()
        .await?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to install CTRL+C handler")?;
    tracing::info!("Shutdown signal received");

    services.stop_all().await?;
    tracing::info!("Bookshelf server stopped");
    Ok(())
}
