//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{routing::get, Router};
use http::Method;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::DeployerError;
use crate::server::handlers::{health_handler, root_handler};
use crate::server::state::ServerState;

/// Build the router with CORS open to any origin
pub fn router(state: Arc<ServerState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), DeployerError>>, DeployerError> {
    let app = router(state);

    let addr = options.addr();
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| DeployerError::Server(format!("bind {}: {}", addr, e)))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| DeployerError::Server(e.to_string()))
    });

    Ok(handle)
}
