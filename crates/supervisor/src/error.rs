// crates/supervisor/src/error.rs
use thiserror::Error;

/// Failures around the worker process itself.
///
/// `Spawn` and `Wait` are recovered locally by the restart loop and only
/// logged; `Gone` is the one error a caller of `SupervisorHandle::shutdown`
/// can see.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for worker exit: {0}")]
    Wait(#[source] std::io::Error),

    #[error("failed to kill worker: {0}")]
    Kill(#[source] std::io::Error),

    #[error("supervisor task ended without reporting completion")]
    Gone,
}
