mod bot;
mod config;
mod downloader;
mod extract;
mod health;
mod pipeline;
mod platform;
mod reply;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::AppState;
use crate::config::Config;
use crate::downloader::HttpDownloadApi;
use crate::pipeline::Pipeline;
use crate::platform::PlatformTable;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,grabbit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    info!("Configuration loaded successfully");
    info!("  Download API: {}", config.downloader.api_url);
    info!("  Request timeout: {}s", config.downloader.timeout_secs);
    info!("  Health port: {}", config.health.port);

    // The health server is an independent task; it shares nothing with the
    // bot loop.
    let port = config.health.port;
    tokio::spawn(async move {
        if let Err(e) = health::run(port).await {
            error!("Health server exited: {:#}", e);
        }
    });

    let api = Arc::new(HttpDownloadApi::new(&config.downloader)?);
    let pipeline = Pipeline::new(PlatformTable::default(), api);
    let state = Arc::new(AppState::new(config, pipeline));

    // Run the Telegram bot
    info!("Bot is starting...");
    bot::run(state).await?;

    Ok(())
}
