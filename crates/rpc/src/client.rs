// crates/rpc/src/client.rs
//! HTTP JSON-RPC client for a single aria2 worker.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::RpcError;
use crate::models::JobRecord;
use crate::protocol::{AriaMethod, RpcRequest, RpcResponse};

/// Per-call timeout applied to every request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// Page size for `aria2.tellWaiting`; large enough to cover every queued or
/// paused job a single user will realistically have.
pub const WAITING_PAGE_SIZE: u64 = 1000;

/// Gateway to the aria2 JSON-RPC endpoint.
///
/// Cheap to clone: clones share the underlying `reqwest::Client` connection
/// pool and the request-id counter. Constructed once in `main` and handed to
/// whoever needs it.
#[derive(Clone)]
pub struct AriaClient {
    http: reqwest::Client,
    rpc_url: String,
    token: String,
    next_id: Arc<AtomicU64>,
}

impl std::fmt::Debug for AriaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AriaClient")
            .field("rpc_url", &self.rpc_url)
            .finish_non_exhaustive()
    }
}

impl AriaClient {
    /// Create a client with the default 3 second request timeout.
    pub fn new(rpc_url: impl Into<String>, secret: &str) -> Result<Self, RpcError> {
        Self::with_timeout(rpc_url, secret, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit per-request timeout.
    pub fn with_timeout(
        rpc_url: impl Into<String>,
        secret: &str,
        timeout: Duration,
    ) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            rpc_url: rpc_url.into(),
            token: format!("token:{secret}"),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn request(&self, method: AriaMethod, args: Vec<Value>) -> RpcRequest {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        RpcRequest::new(method, format!("aria-deck-{n}"), &self.token, args)
    }

    // ------------------------------------------------------------------
    // Request constructors
    // ------------------------------------------------------------------

    /// `aria2.addUri`. Empty `filename`/`dir` count as unset; when both are
    /// unset no options object is sent at all.
    pub fn add_uri_request(&self, url: &str, filename: Option<&str>, dir: Option<&str>) -> RpcRequest {
        let mut options = Map::new();
        if let Some(out) = filename.filter(|s| !s.is_empty()) {
            options.insert("out".to_string(), Value::String(out.to_string()));
        }
        if let Some(dir) = dir.filter(|s| !s.is_empty()) {
            options.insert("dir".to_string(), Value::String(dir.to_string()));
        }

        let mut args = vec![json!([url])];
        if !options.is_empty() {
            args.push(Value::Object(options));
        }
        self.request(AriaMethod::AddUri, args)
    }

    pub fn pause_request(&self, gid: &str) -> RpcRequest {
        self.request(AriaMethod::Pause, vec![json!(gid)])
    }

    pub fn unpause_request(&self, gid: &str) -> RpcRequest {
        self.request(AriaMethod::Unpause, vec![json!(gid)])
    }

    pub fn remove_request(&self, gid: &str) -> RpcRequest {
        self.request(AriaMethod::Remove, vec![json!(gid)])
    }

    pub fn tell_active_request(&self) -> RpcRequest {
        self.request(AriaMethod::TellActive, Vec::new())
    }

    pub fn tell_waiting_request(&self, offset: u64, count: u64) -> RpcRequest {
        self.request(AriaMethod::TellWaiting, vec![json!(offset), json!(count)])
    }

    pub fn shutdown_request(&self) -> RpcRequest {
        self.request(AriaMethod::Shutdown, Vec::new())
    }

    // ------------------------------------------------------------------
    // Typed operations
    // ------------------------------------------------------------------

    /// Queue a new download and return its GID.
    pub async fn add_download(
        &self,
        url: &str,
        filename: Option<&str>,
        dir: Option<&str>,
    ) -> Result<String, RpcError> {
        let gid: String = self.call(&self.add_uri_request(url, filename, dir)).await?;
        tracing::info!(gid = %gid, url = %url, "download queued");
        Ok(gid)
    }

    /// Pause a job. Returns the GID echoed by aria2.
    pub async fn pause(&self, gid: &str) -> Result<String, RpcError> {
        self.call(&self.pause_request(gid)).await
    }

    pub async fn unpause(&self, gid: &str) -> Result<String, RpcError> {
        self.call(&self.unpause_request(gid)).await
    }

    pub async fn remove(&self, gid: &str) -> Result<String, RpcError> {
        self.call(&self.remove_request(gid)).await
    }

    pub async fn tell_active(&self) -> Result<Vec<JobRecord>, RpcError> {
        self.call(&self.tell_active_request()).await
    }

    pub async fn tell_waiting(&self, offset: u64, count: u64) -> Result<Vec<JobRecord>, RpcError> {
        self.call(&self.tell_waiting_request(offset, count)).await
    }

    /// Ask the worker to exit gracefully. aria2 answers `"OK"` before it
    /// actually terminates.
    pub async fn shutdown(&self) -> Result<(), RpcError> {
        let _: String = self.call(&self.shutdown_request()).await?;
        Ok(())
    }

    /// Send one request and decode its `result` as `T`.
    ///
    /// An `error` object in the envelope wins over the HTTP status: aria2
    /// answers rejected calls with a 4xx status and a well-formed envelope.
    pub(crate) async fn call<T: DeserializeOwned>(&self, request: &RpcRequest) -> Result<T, RpcError> {
        tracing::debug!(method = request.method, id = %request.id, "aria2 rpc call");

        let response = self
            .http
            .post(&self.rpc_url)
            .json(request)
            .send()
            .await
            .map_err(RpcError::transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(RpcError::transport)?;

        let envelope: RpcResponse = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => return Err(RpcError::decode(e)),
            Err(_) => return Err(RpcError::Transport(format!("HTTP error: {status}"))),
        };

        if let Some(err) = envelope.error {
            tracing::warn!(
                method = request.method,
                code = err.code,
                message = %err.message,
                "aria2 rejected call"
            );
            return Err(RpcError::Protocol {
                code: err.code,
                message: err.message,
            });
        }
        if !status.is_success() {
            return Err(RpcError::Transport(format!("HTTP error: {status}")));
        }

        if let Some(id) = envelope.id.as_ref().and_then(Value::as_str) {
            if id != request.id {
                return Err(RpcError::Decode(format!(
                    "response id {id:?} does not match request id {:?}",
                    request.id
                )));
            }
        }

        let result = envelope
            .result
            .ok_or_else(|| RpcError::Decode("response carried neither result nor error".to_string()))?;
        serde_json::from_value(result).map_err(RpcError::decode)
    }
}
