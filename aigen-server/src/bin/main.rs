//! aigen chat server binary entry point.
//!
//! Resolves the default provider from the environment and serves the chat
//! endpoint until ctrl-c.

use aigen_server::{serve, BIND_VAR, DEFAULT_BIND};
use anyhow::Result;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing from RUST_LOG (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(BIND_VAR).ok())
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    let handle = serve(&bind).await?;
    shutdown_signal().await;
    handle.shutdown().await?;

    tracing::info!("chat server shut down");
    Ok(())
}

/// Wait for ctrl-c signal for graceful shutdown.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {e}");
        std::future::pending::<()>().await;
    }
}
