// crates/supervisor/src/worker.rs
//! The worker process seam: how a worker is launched, awaited and asked to
//! stop. `Aria2cLauncher` is the real implementation; tests plug in fakes.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use tokio::process::{Child, Command};

use aria_deck_rpc::{AriaClient, RpcError};

use crate::error::SupervisorError;

/// How a worker process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkerExit {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl WorkerExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl std::fmt::Display for WorkerExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

impl From<std::process::ExitStatus> for WorkerExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Starts one worker instance.
#[async_trait]
pub trait WorkerLauncher: Send + Sync + 'static {
    async fn launch(&self) -> Result<Box<dyn WorkerProcess>, SupervisorError>;
}

/// A running worker. Owned by exactly one supervisor loop.
///
/// `wait` must be cancel safe: the supervisor races it against a stop
/// request and polls it again afterwards.
#[async_trait]
pub trait WorkerProcess: Send + 'static {
    fn pid(&self) -> Option<u32>;

    async fn wait(&mut self) -> Result<WorkerExit, SupervisorError>;

    /// Forcefully terminate and reap the process.
    async fn kill(&mut self) -> Result<WorkerExit, SupervisorError>;
}

/// The graceful-stop request sent to a running worker.
#[async_trait]
pub trait WorkerControl: Send + Sync + 'static {
    async fn request_shutdown(&self) -> Result<(), RpcError>;
}

#[async_trait]
impl WorkerControl for AriaClient {
    async fn request_shutdown(&self) -> Result<(), RpcError> {
        self.shutdown().await
    }
}

/// Launch parameters for `aria2c`.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub binary: String,
    pub rpc_port: u16,
    pub rpc_secret: String,
    /// Forward the worker's stdout/stderr instead of discarding them.
    pub inherit_output: bool,
}

impl LaunchConfig {
    /// Fixed command-line flags: RPC on the local port, shared secret, no
    /// disk pre-allocation.
    pub fn args(&self) -> Vec<String> {
        vec![
            "--enable-rpc".to_string(),
            format!("--rpc-listen-port={}", self.rpc_port),
            format!("--rpc-secret={}", self.rpc_secret),
            "--file-allocation=none".to_string(),
        ]
    }
}

/// Spawns real `aria2c` child processes.
pub struct Aria2cLauncher {
    config: LaunchConfig,
}

impl Aria2cLauncher {
    pub fn new(config: LaunchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl WorkerLauncher for Aria2cLauncher {
    async fn launch(&self) -> Result<Box<dyn WorkerProcess>, SupervisorError> {
        let output = || {
            if self.config.inherit_output {
                Stdio::inherit()
            } else {
                Stdio::null()
            }
        };

        let child = Command::new(&self.config.binary)
            .args(self.config.args())
            .stdin(Stdio::null())
            .stdout(output())
            .stderr(output())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SupervisorError::Spawn {
                binary: self.config.binary.clone(),
                source,
            })?;

        Ok(Box::new(ChildWorker { child }))
    }
}

struct ChildWorker {
    child: Child,
}

#[async_trait]
impl WorkerProcess for ChildWorker {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(&mut self) -> Result<WorkerExit, SupervisorError> {
        self.child
            .wait()
            .await
            .map(WorkerExit::from)
            .map_err(SupervisorError::Wait)
    }

    async fn kill(&mut self) -> Result<WorkerExit, SupervisorError> {
        self.child.kill().await.map_err(SupervisorError::Kill)?;
        self.wait().await
    }
}
