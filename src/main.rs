// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tunedeck API Server
//!
//! Serves the Spotify proxy, local playlists and uploaded music files.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunedeck::{config::Config, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        spotify_configured = config.spotify_configured(),
        "Starting Tunedeck API"
    );

    tokio::fs::create_dir_all(&config.data_dir).await?;
    let state = Arc::new(AppState::new(config.clone()));
    state.library.ensure_dir().await?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        music_dir = %state.library.dir().display(),
        "Storage directories ready"
    );

    // Build router
    let app = tunedeck::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tunedeck=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
