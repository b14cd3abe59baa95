//! HTTP server exposing log entries under `/api/logs`.
mod api;
mod error;

pub use api::AppState;
pub use error::ApiError;

use crate::storage::LogStore;
use anyhow::Result;
use axum::{
    routing::{get, put},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Builds the application router over an injected store.
pub fn router(store: Arc<dyn LogStore>) -> Router {
    let api_router = Router::new()
        .route("/api/logs", get(api::list_logs).post(api::create_log))
        .route("/api/logs/", get(api::list_logs).post(api::create_log))
        .route("/api/logs/:id", put(api::update_log).delete(api::delete_log))
        .with_state(store);

    Router::new()
        .merge(api_router)
        .route("/-/healthy", get(api::healthy))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// HTTP server for the log service.
pub struct LogServer {
    store: Arc<dyn LogStore>,
    addr: SocketAddr,
}

impl LogServer {
    /// Creates a server that will own `store` until it shuts down.
    pub fn new(store: Arc<dyn LogStore>, addr: SocketAddr) -> Self {
        Self { store, addr }
    }

    /// Binds, serves until SIGINT/SIGTERM, then closes the store.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        info!("Log service listening on http://{}", listener.local_addr()?);
        serve(listener, self.store, shutdown_signal()).await
    }
}

/// Serves on an already bound listener until `shutdown` resolves, then flushes
/// the store. A failed flush is logged but does not fail the shutdown.
pub async fn serve<F>(listener: TcpListener, store: Arc<dyn LogStore>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = router(store.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    if let Err(e) = store.close().await {
        error!("Failed to flush log store on shutdown: {}", e);
    }
    info!("Log service shut down");
    Ok(())
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
