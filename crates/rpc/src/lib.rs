// crates/rpc/src/lib.rs
//! JSON-RPC gateway to an aria2 worker process.
//!
//! `AriaClient` is the only place requests are assembled: every call gets the
//! `token:<secret>` parameter injected first and its `result` decoded into a
//! typed value before it leaves this crate.

pub mod aggregate;
pub mod client;
pub mod error;
pub mod models;
pub mod protocol;

pub use client::{AriaClient, DEFAULT_REQUEST_TIMEOUT, WAITING_PAGE_SIZE};
pub use error::RpcError;
pub use models::{FileEntry, JobRecord, JobStatus};
pub use protocol::{AriaMethod, RpcErrorObject, RpcRequest, RpcResponse};
