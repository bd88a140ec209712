// crates/server/src/state.rs
//! Application state for the Axum server.

use std::sync::Arc;
use std::time::Instant;

use aria_deck_rpc::AriaClient;
use aria_deck_supervisor::WorkerState;
use tokio::sync::watch;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    /// Server start time for uptime tracking.
    pub start_time: Instant,
    /// Gateway to the supervised aria2 worker.
    pub aria: AriaClient,
    /// Read-only view of the supervisor's worker state.
    pub worker_state: watch::Receiver<WorkerState>,
}

impl AppState {
    /// Create a new application state wrapped in an Arc for sharing.
    pub fn new(aria: AriaClient, worker_state: watch::Receiver<WorkerState>) -> Arc<Self> {
        Arc::new(Self {
            start_time: Instant::now(),
            aria,
            worker_state,
        })
    }

    /// Get the server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn worker_state(&self) -> WorkerState {
        *self.worker_state.borrow()
    }
}
