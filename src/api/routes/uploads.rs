//! Upload Routes
//!
//! - GET /api/v1/uploads - Uploaded-files table
//! - POST /api/v1/uploads - Submit file descriptors
//! - POST /api/v1/uploads/drag-over - Highlight the drop zone

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{UploadListResponse, UploadRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{Layout, UploadReceipt};

/// GET /api/v1/uploads
pub async fn list_uploads(State(state): State<Arc<AppState>>) -> Json<UploadListResponse> {
    let files = state.dashboard.uploads().await;
    Json(UploadListResponse {
        total: files.len(),
        files,
    })
}

/// POST /api/v1/uploads
///
/// Returns 202 with the receipt; accepted files complete asynchronously.
pub async fn submit_files(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UploadRequest>,
) -> ApiResult<(StatusCode, Json<UploadReceipt>)> {
    if req.files.is_empty() {
        return Err(ApiError::Validation("No files submitted".to_string()));
    }

    let receipt = state.dashboard.handle_files(req.files).await?;

    tracing::info!(
        accepted = receipt.accepted.len(),
        rejected = receipt.rejected.len(),
        "Files submitted"
    );

    Ok((StatusCode::ACCEPTED, Json(receipt)))
}

/// POST /api/v1/uploads/drag-over
pub async fn drag_over(State(state): State<Arc<AppState>>) -> Json<Layout> {
    Json(state.dashboard.drag_over().await)
}
