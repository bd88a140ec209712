// crates/rpc/src/protocol.rs
//! JSON-RPC 2.0 envelope types spoken by aria2's `/jsonrpc` endpoint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version tag sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// The aria2 methods this gateway knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaMethod {
    AddUri,
    Pause,
    Unpause,
    Remove,
    TellActive,
    TellWaiting,
    Shutdown,
}

impl AriaMethod {
    /// Wire name of the method.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AddUri => "aria2.addUri",
            Self::Pause => "aria2.pause",
            Self::Unpause => "aria2.unpause",
            Self::Remove => "aria2.remove",
            Self::TellActive => "aria2.tellActive",
            Self::TellWaiting => "aria2.tellWaiting",
            Self::Shutdown => "aria2.shutdown",
        }
    }
}

impl std::fmt::Display for AriaMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single authenticated request.
///
/// Only built through `AriaClient`'s per-method constructors, which always
/// put the `token:<secret>` string in `params[0]`.
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest {
    pub(crate) jsonrpc: &'static str,
    pub(crate) method: &'static str,
    pub(crate) id: String,
    pub(crate) params: Vec<Value>,
}

impl RpcRequest {
    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Positional parameters, token first.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub(crate) fn new(method: AriaMethod, id: String, token: &str, args: Vec<Value>) -> Self {
        let mut params = Vec::with_capacity(args.len() + 1);
        params.push(Value::String(token.to_string()));
        params.extend(args);
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.as_str(),
            id,
            params,
        }
    }
}

/// `error` member of a response envelope.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RpcErrorObject {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Response envelope. `result` stays opaque until the method's decoder
/// turns it into a typed value.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serializes_envelope() {
        let req = RpcRequest::new(
            AriaMethod::Pause,
            "aria-deck-1".to_string(),
            "token:s3cret",
            vec![json!("2089b05ecca3d829")],
        );
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "method": "aria2.pause",
                "id": "aria-deck-1",
                "params": ["token:s3cret", "2089b05ecca3d829"],
            })
        );
    }

    #[test]
    fn test_response_with_error_descriptor() {
        let resp: RpcResponse = serde_json::from_str(
            r#"{"id":"x","jsonrpc":"2.0","error":{"code":1,"message":"Unauthorized"}}"#,
        )
        .unwrap();
        assert!(resp.result.is_none());
        assert_eq!(
            resp.error,
            Some(RpcErrorObject {
                code: 1,
                message: "Unauthorized".to_string()
            })
        );
    }

    #[test]
    fn test_method_names() {
        assert_eq!(AriaMethod::AddUri.as_str(), "aria2.addUri");
        assert_eq!(AriaMethod::TellWaiting.to_string(), "aria2.tellWaiting");
        assert_eq!(AriaMethod::Shutdown.as_str(), "aria2.shutdown");
    }
}
