//! Event Log Routes
//!
//! - GET /api/v1/logs - Rows with visibility and dropdown options
//! - PUT /api/v1/logs/filter - Change the dropdown selections

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::LogFilterResponse;
use crate::api::state::AppState;
use crate::dashboard::{FilterSelection, LogsView};

/// GET /api/v1/logs
pub async fn list_logs(State(state): State<Arc<AppState>>) -> Json<LogsView> {
    Json(state.dashboard.view().await.logs)
}

/// PUT /api/v1/logs/filter
///
/// Missing fields default to the "All" option.
pub async fn set_filter(
    State(state): State<Arc<AppState>>,
    Json(selection): Json<FilterSelection>,
) -> Json<LogFilterResponse> {
    let (selection, visible) = state.dashboard.set_log_filter(&selection).await;
    Json(LogFilterResponse { selection, visible })
}
