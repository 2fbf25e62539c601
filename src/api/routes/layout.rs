//! Layout Routes
//!
//! - POST /api/v1/layout/resize - Viewport width changed
//! - POST /api/v1/layout/sidebar/toggle - Mobile menu button pressed

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::ResizeRequest;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::Layout;

/// POST /api/v1/layout/resize
pub async fn resize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResizeRequest>,
) -> ApiResult<Json<Layout>> {
    if req.width == 0 {
        return Err(ApiError::Validation("Width must be positive".to_string()));
    }
    Ok(Json(state.dashboard.resize(req.width).await))
}

/// POST /api/v1/layout/sidebar/toggle
pub async fn toggle_sidebar(State(state): State<Arc<AppState>>) -> Json<Layout> {
    Json(state.dashboard.toggle_sidebar().await)
}
