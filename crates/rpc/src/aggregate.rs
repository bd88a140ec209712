// crates/rpc/src/aggregate.rs
//! Single consistent view over the worker's active and queued jobs.

use crate::client::{AriaClient, WAITING_PAGE_SIZE};
use crate::error::RpcError;
use crate::models::JobRecord;

impl AriaClient {
    /// All jobs the user cares about: active first, then waiting/paused,
    /// each in the order aria2 reports them.
    ///
    /// All or nothing. If `tellActive` fails `tellWaiting` is never sent, and
    /// if `tellWaiting` fails the active jobs already fetched are dropped.
    pub async fn relevant_downloads(&self) -> Result<Vec<JobRecord>, RpcError> {
        let mut jobs = self.tell_active().await?;
        let waiting = self.tell_waiting(0, WAITING_PAGE_SIZE).await?;
        jobs.extend(waiting);
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn wire_job(gid: &str, status: &str) -> Value {
        json!({
            "gid": gid,
            "status": status,
            "totalLength": "100",
            "completedLength": "10",
            "downloadSpeed": "5",
            "dir": "/downloads",
            "connections": "1",
            "files": [],
        })
    }

    async fn mount_method(server: &MockServer, name: &str, response: ResponseTemplate, times: u64) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "method": name })))
            .respond_with(response)
            .expect(times)
            .mount(server)
            .await;
    }

    fn ok(result: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"jsonrpc": "2.0", "result": result}))
    }

    fn client(server: &MockServer) -> AriaClient {
        AriaClient::new(format!("{}/jsonrpc", server.uri()), "s3cret").unwrap()
    }

    #[tokio::test]
    async fn test_active_then_waiting_order() {
        let server = MockServer::start().await;
        mount_method(
            &server,
            "aria2.tellActive",
            ok(json!([wire_job("A", "active"), wire_job("B", "active")])),
            1,
        )
        .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "aria2.tellWaiting",
                "params": ["token:s3cret", 0, 1000],
            })))
            .respond_with(ok(json!([wire_job("C", "paused")])))
            .expect(1)
            .mount(&server)
            .await;

        let jobs = client(&server).relevant_downloads().await.unwrap();
        let gids: Vec<&str> = jobs.iter().map(|j| j.gid.as_str()).collect();
        assert_eq!(gids, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_waiting_failure_returns_no_partial_list() {
        let server = MockServer::start().await;
        mount_method(
            &server,
            "aria2.tellActive",
            ok(json!([wire_job("A", "active"), wire_job("B", "active")])),
            1,
        )
        .await;
        mount_method(
            &server,
            "aria2.tellWaiting",
            ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": {"code": 1, "message": "boom"},
            })),
            1,
        )
        .await;

        let err = client(&server).relevant_downloads().await.unwrap_err();
        assert!(matches!(err, RpcError::Protocol { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_active_failure_skips_waiting_call() {
        let server = MockServer::start().await;
        mount_method(
            &server,
            "aria2.tellActive",
            ResponseTemplate::new(503).set_body_string("down"),
            1,
        )
        .await;
        mount_method(&server, "aria2.tellWaiting", ok(json!([])), 0).await;

        let err = client(&server).relevant_downloads().await.unwrap_err();
        assert!(err.is_transport(), "got {err:?}");
    }

    #[tokio::test]
    async fn test_empty_worker_gives_empty_list() {
        let server = MockServer::start().await;
        mount_method(&server, "aria2.tellActive", ok(json!([])), 1).await;
        mount_method(&server, "aria2.tellWaiting", ok(json!([])), 1).await;

        let jobs = client(&server).relevant_downloads().await.unwrap();
        assert!(jobs.is_empty());
    }
}
