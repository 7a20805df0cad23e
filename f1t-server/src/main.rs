//! F1 Telemetry Server
//!
//! Binds the game's UDP telemetry port, decodes the stream into a live
//! race-state snapshot and optionally relays raw packets to a second tool.

use anyhow::{Context, Result};
use f1t_server::{config, engine, forward, listener, state};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting F1 Telemetry Server");

    // First argument overrides the default config location
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::Config::load(config_path.as_deref())?;

    let state = state::AppState::new();
    let forwarder = forward::Forwarder::from_config(&config.forwarding);

    let socket = UdpSocket::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
    let socket = Arc::new(socket);

    let cancel = CancellationToken::new();
    let (tx, rx) = mpsc::channel(256);

    let listener_task = tokio::spawn(listener::run(socket, tx, cancel.clone()));
    let engine_task = tokio::spawn(
        engine::Engine::new(state.clone(), forwarder).run(rx, cancel.clone()),
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    info!("Shutting down");
    cancel.cancel();

    listener_task.await?;
    engine_task.await?;

    Ok(())
}
