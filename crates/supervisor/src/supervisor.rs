// crates/supervisor/src/supervisor.rs
//! Restart loop that keeps exactly one worker alive until told to stop.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::SupervisorError;
use crate::worker::{WorkerControl, WorkerExit, WorkerLauncher, WorkerProcess};

/// Delay between a failed spawn or a crash and the next launch attempt.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(1);

/// Lifecycle of the supervised worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerState {
    Starting,
    Running,
    Stopping,
    Stopped,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    pub restart_delay: Duration,
    /// Upper bound on the wait for a worker to exit after `aria2.shutdown`.
    /// When it elapses the worker is killed. `None` waits forever.
    pub shutdown_timeout: Option<Duration>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            restart_delay: DEFAULT_RESTART_DELAY,
            shutdown_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Outcome of the graceful stop path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopReport {
    /// Exit of the last worker. `None` if no worker was alive when the stop
    /// request arrived (spawn retry or restart delay).
    pub exit: Option<WorkerExit>,
    /// The worker ignored `aria2.shutdown` past the timeout and was killed.
    pub killed: bool,
    /// Number of workers launched over the supervisor's lifetime.
    pub launches: u64,
}

/// Owns the worker lifecycle. Consumed by [`Supervisor::spawn`].
pub struct Supervisor<L, C> {
    launcher: L,
    control: C,
    config: SupervisorConfig,
}

/// Caller-side handle to a running supervisor.
///
/// `shutdown` takes `self`, so the stop request can only ever be sent once.
pub struct SupervisorHandle {
    stop_tx: oneshot::Sender<()>,
    stopped_rx: oneshot::Receiver<StopReport>,
    state_rx: watch::Receiver<WorkerState>,
    task: JoinHandle<()>,
}

impl SupervisorHandle {
    /// Read-only subscription to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<WorkerState> {
        self.state_rx.clone()
    }

    /// Request a graceful stop and wait until the worker has exited.
    pub async fn shutdown(self) -> Result<StopReport, SupervisorError> {
        // The loop may already be gone (panic); the completion receive below
        // reports that.
        let _ = self.stop_tx.send(());
        let report = self.stopped_rx.await.map_err(|_| SupervisorError::Gone)?;
        if let Err(e) = self.task.await {
            error!(error = %e, "supervisor task did not finish cleanly");
        }
        Ok(report)
    }
}

impl<L, C> Supervisor<L, C>
where
    L: WorkerLauncher,
    C: WorkerControl,
{
    pub fn new(launcher: L, control: C, config: SupervisorConfig) -> Self {
        Self {
            launcher,
            control,
            config,
        }
    }

    /// Start the restart loop on the Tokio runtime.
    pub fn spawn(self) -> SupervisorHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let (stopped_tx, stopped_rx) = oneshot::channel();
        let (state_tx, state_rx) = watch::channel(WorkerState::Starting);

        let task = tokio::spawn(async move {
            let report = self.run(stop_rx, &state_tx).await;
            state_tx.send_replace(WorkerState::Stopped);
            info!(launches = report.launches, killed = report.killed, "aria2 supervisor stopped");
            let _ = stopped_tx.send(report);
        });

        SupervisorHandle {
            stop_tx,
            stopped_rx,
            state_rx,
            task,
        }
    }

    async fn run(
        self,
        mut stop_rx: oneshot::Receiver<()>,
        state_tx: &watch::Sender<WorkerState>,
    ) -> StopReport {
        let delay = self.config.restart_delay;
        let mut launches: u64 = 0;

        loop {
            state_tx.send_replace(WorkerState::Starting);

            let mut worker = match self.launcher.launch().await {
                Ok(worker) => worker,
                Err(e) => {
                    warn!(error = %e, retry_in_ms = delay.as_millis() as u64, "failed to start aria2 worker");
                    tokio::select! {
                        // A dropped handle counts as a stop request.
                        _ = &mut stop_rx => {
                            return StopReport { exit: None, killed: false, launches };
                        }
                        _ = tokio::time::sleep(delay) => continue,
                    }
                }
            };
            launches += 1;
            state_tx.send_replace(WorkerState::Running);
            info!(pid = ?worker.pid(), launches, "aria2 worker started");

            tokio::select! {
                exit = worker.wait() => {
                    state_tx.send_replace(WorkerState::Starting);
                    match exit {
                        Ok(exit) => warn!(%exit, "aria2 worker exited unexpectedly, restarting"),
                        Err(e) => warn!(error = %e, "lost track of aria2 worker, restarting"),
                    }
                }
                _ = &mut stop_rx => {
                    state_tx.send_replace(WorkerState::Stopping);
                    let (exit, killed) = self.stop_worker(worker.as_mut()).await;
                    return StopReport { exit, killed, launches };
                }
            }

            tokio::select! {
                _ = &mut stop_rx => {
                    return StopReport { exit: None, killed: false, launches };
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Graceful path: ask the worker to shut down, then wait for the exit.
    /// Any exit observed here is the expected completion, never a crash.
    async fn stop_worker(&self, worker: &mut dyn WorkerProcess) -> (Option<WorkerExit>, bool) {
        info!(pid = ?worker.pid(), "stopping aria2 worker");
        if let Err(e) = self.control.request_shutdown().await {
            warn!(error = %e, "aria2.shutdown call failed, waiting for worker exit anyway");
        }

        let waited = match self.config.shutdown_timeout {
            Some(limit) => tokio::time::timeout(limit, worker.wait()).await.ok(),
            None => Some(worker.wait().await),
        };

        match waited {
            Some(Ok(exit)) => {
                if exit.success() {
                    info!(%exit, "aria2 worker exited");
                } else {
                    warn!(%exit, "aria2 worker exited with failure during shutdown");
                }
                (Some(exit), false)
            }
            Some(Err(e)) => {
                error!(error = %e, "failed to observe aria2 worker exit");
                (None, false)
            }
            None => {
                warn!("aria2 worker ignored shutdown request, killing it");
                match worker.kill().await {
                    Ok(exit) => (Some(exit), true),
                    Err(e) => {
                        error!(error = %e, "failed to kill aria2 worker");
                        (None, true)
                    }
                }
            }
        }
    }
}
