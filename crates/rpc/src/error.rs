// crates/rpc/src/error.rs
use thiserror::Error;

/// Errors returned by a single JSON-RPC call to the aria2 worker.
///
/// The variants are deliberately coarse: callers only need to tell
/// "worker unreachable" apart from "worker said no" and "worker said
/// something we could not read".
#[derive(Debug, Error)]
pub enum RpcError {
    /// Connection refused, request timed out, or a non-2xx status without an
    /// error envelope.
    #[error("aria2 worker unreachable: {0}")]
    Transport(String),

    /// The response envelope carried an `error` object.
    #[error("aria2 error {code}: {message}")]
    Protocol { code: i64, message: String },

    /// The body was not JSON, not an envelope, or the `result` did not have
    /// the shape the method returns.
    #[error("malformed aria2 response: {0}")]
    Decode(String),
}

impl RpcError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            Self::Transport(format!("connection failed: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }

    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }

    /// True when the worker could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
