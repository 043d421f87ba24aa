//! HTTP server implementation for the query service.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use common::{Clock, SystemClock};
use tokio::signal;

use super::config::QueryServerConfig;
use super::handlers::{handle_healthy, handle_metrics, handle_query, handle_ready, AppState};
use super::metrics::Metrics;
use crate::config::LogFileOptions;

/// HTTP server answering time-range queries over a deployment root.
pub struct QueryServer {
    opts: LogFileOptions,
    config: QueryServerConfig,
}

impl QueryServer {
    /// Creates a new query server.
    pub fn new(opts: LogFileOptions, config: QueryServerConfig) -> Self {
        Self { opts, config }
    }

    /// Builds the router with all routes and shared state.
    ///
    /// Exposed separately from [`run`](QueryServer::run) so tests can drive
    /// the router without binding a socket.
    pub fn router(opts: LogFileOptions, clock: Arc<dyn Clock>) -> Router {
        let state = AppState {
            opts: Arc::new(opts),
            clock,
            metrics: Arc::new(Metrics::new()),
        };

        Router::new()
            .route("/api/v1/query", get(handle_query))
            .route("/metrics", get(handle_metrics))
            .route("/-/healthy", get(handle_healthy))
            .route("/-/ready", get(handle_ready))
            .with_state(state)
    }

    /// Runs the HTTP server until SIGINT or SIGTERM.
    pub async fn run(self) {
        let app = Self::router(self.opts, Arc::new(SystemClock));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.port));
        tracing::info!("starting query server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .unwrap();

        tracing::info!("server shut down gracefully");
    }
}

/// Listen for SIGTERM (pod termination) and SIGINT (Ctrl+C).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("received SIGTERM, starting graceful shutdown"),
    }
}
