// crates/supervisor/src/lib.rs
//! Lifecycle supervision for the `aria2c` worker process.
//!
//! One [`Supervisor`] keeps at most one worker alive: it relaunches after
//! spawn failures and crashes with a fixed delay, and on request drives the
//! worker through `aria2.shutdown` and waits for it to exit.

pub mod error;
pub mod supervisor;
pub mod worker;

pub use error::SupervisorError;
pub use supervisor::{
    StopReport, Supervisor, SupervisorConfig, SupervisorHandle, WorkerState, DEFAULT_RESTART_DELAY,
};
pub use worker::{
    Aria2cLauncher, LaunchConfig, WorkerControl, WorkerExit, WorkerLauncher, WorkerProcess,
};
