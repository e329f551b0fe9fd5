//! Ticket Tracker Server
//!
//! Serves the ticket API until Ctrl+C, then closes every session.
//!
//! # Usage
//!
//! ```bash
//! PORT=8080 RUST_LOG=info,tracker=debug cargo run --bin server
//! ```

use std::sync::Arc;
use tracker::{build_router, spawn_session_sweeper, AppState, Config};
use tracker_core::environment::SystemClock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(config.log_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        address = %config.bind_address(),
        log_level = %config.server.log_level,
        session_ttl_secs = config.session.ttl,
        request_timeout_ms = config.server.request_timeout_ms,
        "Configuration loaded"
    );

    let shutdown_timeout = config.shutdown_timeout();
    let address = config.bind_address();
    let state = AppState::new(config, Arc::new(SystemClock));

    let sweeper = spawn_session_sweeper(state.clone());
    let app = build_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "Ticket tracker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully...");
    sweeper.abort();
    state.shutdown(shutdown_timeout).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
