//! API route handlers for the aria-deck server.

pub mod downloads;
pub mod health;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check and worker state
/// - GET  /api/downloads - Active then waiting/paused jobs
/// - POST /api/downloads - Queue a new download
/// - POST /api/downloads/{gid}/pause - Pause a job
/// - POST /api/downloads/{gid}/unpause - Resume a paused job
/// - POST /api/downloads/{gid}/remove - Remove a job
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", downloads::router())
        .with_state(state)
}
