// crates/server/src/error.rs
use aria_deck_rpc::RpcError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("aria2 worker error: {0}")]
    Worker(#[from] RpcError),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::Worker(rpc_err) => match rpc_err {
                RpcError::Transport(msg) => {
                    tracing::error!(error = %msg, "aria2 worker unreachable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        ErrorResponse::with_details("Download engine unavailable", msg.clone()),
                    )
                }
                RpcError::Protocol { code, message } => {
                    tracing::warn!(code = %code, message = %message, "aria2 rejected request");
                    (
                        StatusCode::BAD_GATEWAY,
                        ErrorResponse::with_details("Download engine rejected request", message.clone()),
                    )
                }
                RpcError::Decode(msg) => {
                    tracing::error!(error = %msg, "malformed aria2 response");
                    (
                        StatusCode::BAD_GATEWAY,
                        ErrorResponse::new("Malformed response from download engine"),
                    )
                }
            },
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use pretty_assertions::assert_eq;

    /// Helper to extract status code and body from a response
    async fn extract_response(response: Response) -> (StatusCode, ErrorResponse) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error_response: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, error_response)
    }

    #[tokio::test]
    async fn test_transport_error_returns_503() {
        let error = ApiError::Worker(RpcError::Transport("connection refused".to_string()));
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.error, "Download engine unavailable");
        assert!(body.details.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_protocol_error_returns_502_with_worker_message() {
        let error = ApiError::Worker(RpcError::Protocol {
            code: 1,
            message: "GID 2089b05ecca3d829 is not found".to_string(),
        });
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body.details.as_deref(), Some("GID 2089b05ecca3d829 is not found"));
    }

    #[tokio::test]
    async fn test_decode_error_hides_details() {
        let error = ApiError::Worker(RpcError::Decode("expected a sequence".to_string()));
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.details.is_none());
    }

    #[tokio::test]
    async fn test_bad_request_returns_400() {
        let error = ApiError::BadRequest("url is required".to_string());
        let (status, body) = extract_response(error.into_response()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Bad request");
        assert_eq!(body.details.as_deref(), Some("url is required"));
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::new("Test error");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"error\":\"Test error\""));
        assert!(!json.contains("details")); // None should be skipped

        let response = ErrorResponse::with_details("Test error", "More info");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"details\":\"More info\""));
    }

    #[test]
    fn test_api_error_from_rpc_error() {
        let api_err: ApiError = RpcError::Decode("x".to_string()).into();
        assert!(matches!(api_err, ApiError::Worker(RpcError::Decode(_))));
    }
}
