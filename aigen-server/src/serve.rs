//! Shared serve entrypoint used by the binary and the tests.

use crate::chat::router;
use aigen::AiContext;
use anyhow::{Context, Result};
use tokio::sync::oneshot;

/// Handle returned by [`serve_with_context`]; holds the bound port and shutdown trigger.
pub struct ServeHandle {
    /// The port the server is listening on.
    pub port: u16,
    shutdown_tx: Option<oneshot::Sender<()>>,
    join: Option<tokio::task::JoinHandle<Result<(), std::io::Error>>>,
}

impl ServeHandle {
    /// Trigger graceful shutdown and wait for the server to stop.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take() {
            join.await??;
        }
        Ok(())
    }
}

/// Build the default provider from the environment and start serving on `bind`.
pub async fn serve(bind: &str) -> Result<ServeHandle> {
    let context = AiContext::from_env().context("AI provider initialization failed")?;
    serve_with_context(context, bind).await
}

/// Bind the axum server with an already-built context.
///
/// The server runs in a spawned task; call [`ServeHandle::shutdown`] to stop it.
pub async fn serve_with_context(context: AiContext, bind: &str) -> Result<ServeHandle> {
    let app = router(context);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("chat server listening on {bind} (port {port})");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("received shutdown signal");
            })
            .await
    });

    Ok(ServeHandle {
        port,
        shutdown_tx: Some(shutdown_tx),
        join: Some(join),
    })
}
