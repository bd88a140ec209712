// crates/server/src/lib.rs
//! aria-deck server library.
//!
//! Axum HTTP control surface over a supervised aria2c worker, plus the
//! shutdown coordinator that keeps the listener open until the worker has
//! exited.

pub mod config;
pub mod error;
pub mod routes;
pub mod shutdown;
pub mod state;

pub use config::Config;
pub use error::*;
pub use routes::api_routes;
pub use shutdown::{interrupt_signal, serve_until_stopped, ShutdownCoordinator, ShutdownSignal};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the Axum application with all routes and middleware.
///
/// This sets up:
/// - API routes (health, downloads)
/// - CORS (allows any origin)
/// - Request tracing
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api_routes(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

// ============================================================================
// Integration Tests
// ============================================================================
