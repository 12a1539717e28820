use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tracing::info;

async fn home() -> &'static str {
    "🤖 Telegram Social Downloader Bot is Running!"
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn ping() -> &'static str {
    "pong"
}

fn router() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/ping", get(ping))
}

/// Serve hosting-platform liveness probes until the process exits. Runs as
/// its own task and shares nothing with the bot loop.
pub async fn run(port: u16) -> Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind health server to {}", addr))?;

    info!("Health server listening on {}", addr);

    axum::serve(listener, router())
        .await
        .context("Health server error")?;

    Ok(())
}
