//! Webhook receiver entry point.
//!
//! Loads signing keys from the environment and serves `/webhook` until
//! ctrl-c. TLS is left to whatever sits in front of it.

use anyhow::Result;
use clap::Parser;
use eventsub_server::{config, router, AppState, Config, LogDispatcher};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing from RUST_LOG (default: info).
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();
    let keys = config::keys_from_env();
    let state = AppState::new(keys, Arc::new(LogDispatcher));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!("listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

/// Wait for ctrl-c signal for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown signal");
}
