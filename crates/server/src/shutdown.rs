// crates/server/src/shutdown.rs
//! Shutdown sequencing: interrupt, then worker stop, then listener close.
//!
//! The coordinator is the only producer on a one-slot completion channel and
//! the listener host is its only consumer. The listener therefore cannot
//! close before the worker has exited.

use std::future::Future;

use aria_deck_supervisor::{StopReport, SupervisorError, SupervisorHandle};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{error, info};

/// Completion token sent once the worker has been stopped.
#[derive(Debug)]
pub struct ShutdownSignal {
    /// `None` when the supervisor task died before reporting.
    pub report: Option<StopReport>,
}

/// Drives the supervisor's stop path when the interrupt fires.
pub struct ShutdownCoordinator {
    supervisor: SupervisorHandle,
    completion_tx: oneshot::Sender<ShutdownSignal>,
}

impl ShutdownCoordinator {
    /// Returns the coordinator and the completion receiver for the listener.
    pub fn new(supervisor: SupervisorHandle) -> (Self, oneshot::Receiver<ShutdownSignal>) {
        let (completion_tx, completion_rx) = oneshot::channel();
        (
            Self {
                supervisor,
                completion_tx,
            },
            completion_rx,
        )
    }

    /// Wait for `interrupt`, stop the worker, then release the listener.
    ///
    /// The completion signal is sent whether or not the supervisor reported
    /// cleanly, so the listener is never left open behind a dead supervisor.
    pub async fn run<F>(self, interrupt: F) -> Result<StopReport, SupervisorError>
    where
        F: Future<Output = ()>,
    {
        interrupt.await;
        info!("shutdown requested, stopping aria2 worker");

        let result = self.supervisor.shutdown().await;
        let signal = ShutdownSignal {
            report: result.as_ref().ok().cloned(),
        };
        if let Err(e) = &result {
            error!(error = %e, "aria2 supervisor did not report a clean stop");
        }
        if self.completion_tx.send(signal).is_err() {
            // Listener already gone (serve loop failed on its own).
            error!("listener dropped before shutdown completed");
        }
        result
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn interrupt_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl-C"),
        _ = terminate => info!("received SIGTERM"),
    }
}

/// Serve `app` until the completion signal arrives, then close the listener.
pub async fn serve_until_stopped(
    listener: TcpListener,
    app: Router,
    completion: oneshot::Receiver<ShutdownSignal>,
) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            match completion.await {
                Ok(signal) => info!(report = ?signal.report, "worker stopped, closing listener"),
                Err(_) => error!("shutdown coordinator dropped, closing listener"),
            }
        })
        .await
}
