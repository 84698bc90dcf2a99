//! Axum server lifecycle: bind, serve, and graceful shutdown

use std::future::Future;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use super::routes::create_router;
use super::state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Serve the request API on `addr` until `shutdown` resolves
pub async fn serve<F>(state: AppState, addr: SocketAddr, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    let local = listener.local_addr()?;

    tracing::info!(addr = %local, "API listening on http://{}/api", local);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("API server stopped gracefully");
    Ok(())
}
