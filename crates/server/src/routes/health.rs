use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;
use store::ClusterStore;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness)
/// Returns 200 if server is running
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "grantsim-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
    }))
}

/// Readiness check endpoint
/// Returns 200 if server is ready to accept requests
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    // The in-memory store is always reachable; a remote-store deployment
    // would surface its probe here.
    let store_status = match state.store.count().await {
        Ok(_) => "ready",
        Err(_) => "unavailable",
    };

    Ok(Json(json!({
        "status": "ready",
        "service": "grantsim-server",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "uptime_seconds": uptime_seconds(),
        "components": {
            "api": "ready",
            "store": store_status,
            "resolver": "ready",
        }
    })))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<Response> {
    match &state.metrics {
        Some(handle) => Ok(handle.render().into_response()),
        // Metrics disabled: report uptime only, keeping the route well-formed.
        None => Ok(Json(json!({ "uptime_seconds": uptime_seconds() })).into_response()),
    }
}
