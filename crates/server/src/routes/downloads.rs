// crates/server/src/routes/downloads.rs
//! Download job endpoints. Thin wrappers over the aria2 gateway.

use std::sync::Arc;

use aria_deck_rpc::JobRecord;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Body of `POST /api/downloads`.
#[derive(Debug, Deserialize)]
pub struct AddDownloadRequest {
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub dir: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub struct AddDownloadResponse {
    pub gid: String,
}

/// Response for pause/unpause/remove.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(Deserialize))]
pub struct JobActionResponse {
    pub status: String,
    pub gid: String,
}

impl JobActionResponse {
    fn ok(gid: String) -> Self {
        Self {
            status: "ok".to_string(),
            gid,
        }
    }
}

/// GET /api/downloads - Active jobs followed by waiting/paused jobs.
pub async fn list_downloads(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<JobRecord>>> {
    let jobs = state.aria.relevant_downloads().await?;
    Ok(Json(jobs))
}

/// POST /api/downloads - Queue a URL, optionally with output filename and
/// target directory.
pub async fn add_download(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddDownloadRequest>,
) -> ApiResult<Json<AddDownloadResponse>> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(ApiError::BadRequest("url is required".to_string()));
    }

    let gid = state
        .aria
        .add_download(url, req.filename.as_deref(), req.dir.as_deref())
        .await?;
    Ok(Json(AddDownloadResponse { gid }))
}

/// POST /api/downloads/{gid}/pause
pub async fn pause_download(
    State(state): State<Arc<AppState>>,
    Path(gid): Path<String>,
) -> ApiResult<Json<JobActionResponse>> {
    let gid = state.aria.pause(&gid).await?;
    tracing::info!(gid = %gid, "download paused");
    Ok(Json(JobActionResponse::ok(gid)))
}

/// POST /api/downloads/{gid}/unpause
pub async fn unpause_download(
    State(state): State<Arc<AppState>>,
    Path(gid): Path<String>,
) -> ApiResult<Json<JobActionResponse>> {
    let gid = state.aria.unpause(&gid).await?;
    tracing::info!(gid = %gid, "download resumed");
    Ok(Json(JobActionResponse::ok(gid)))
}

/// POST /api/downloads/{gid}/remove
pub async fn remove_download(
    State(state): State<Arc<AppState>>,
    Path(gid): Path<String>,
) -> ApiResult<Json<JobActionResponse>> {
    let gid = state.aria.remove(&gid).await?;
    tracing::info!(gid = %gid, "download removed");
    Ok(Json(JobActionResponse::ok(gid)))
}

/// Create the download routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/downloads", get(list_downloads).post(add_download))
        .route("/downloads/{gid}/pause", post(pause_download))
        .route("/downloads/{gid}/unpause", post(unpause_download))
        .route("/downloads/{gid}/remove", post(remove_download))
}
