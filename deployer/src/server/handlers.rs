//! HTTP request handlers

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use openapi_server::models::{HealthResponse, RootResponse};

use crate::server::state::ServerState;

/// Root handler
pub async fn root_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(RootResponse {
        message: format!("{} is running", state.service),
    })
}

/// Health check handler
pub async fn health_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: state.service.clone(),
        version: state.version.version.clone(),
        started_at: state.started_at_rfc3339(),
        uptime_secs: state.uptime_secs(),
    })
}
