// =============================================================================
// Equity Dashboard — Main Entry Point
// =============================================================================
//
// Serves the dashboard page and its JSON API.  Every request fetches fresh
// history from the quote provider; nothing is cached between requests.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod comparison;
mod config;
mod error;
mod indicators;
mod market_data;
mod presentation;
mod statistics;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::config::{DashboardConfig, CONFIG_PATH};
use crate::market_data::YahooClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Equity Dashboard starting up");

    let mut config = DashboardConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        DashboardConfig::default()
    });
    config.apply_env_overrides();

    info!(
        symbols = ?config.symbols,
        period = %config.period,
        interval = %config.interval,
        data_url = %config.data_url,
        "Dashboard configured"
    );

    // ── 2. Data source & shared state ────────────────────────────────────
    let source = YahooClient::new(config.data_url.clone())?;
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, source));

    // ── 3. HTTP server ───────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Equity Dashboard shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
