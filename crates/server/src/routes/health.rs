// crates/server/src/routes/health.rs
//! Health check endpoint for the API.

use std::sync::Arc;

use aria_deck_supervisor::WorkerState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Response for the health check endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub worker: WorkerState,
}

/// GET /api/health - Health check endpoint.
///
/// Returns server status, version, uptime and the aria2 worker's lifecycle
/// state. Never calls the worker.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        worker: state.worker_state(),
    })
}

/// Create the health routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}
