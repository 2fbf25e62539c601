//! Notification Routes
//!
//! - GET /api/v1/notifications - Displayed toasts, oldest first
//! - POST /api/v1/notifications - Show a toast
//! - DELETE /api/v1/notifications/:id - Dismiss a toast

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{NotificationListResponse, NotifyRequest};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::Notification;

/// GET /api/v1/notifications
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
) -> Json<NotificationListResponse> {
    let notifications = state.dashboard.notifications().await;
    Json(NotificationListResponse {
        total: notifications.len(),
        notifications,
    })
}

/// POST /api/v1/notifications
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NotifyRequest>,
) -> ApiResult<(StatusCode, Json<Notification>)> {
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation("Message cannot be empty".to_string()));
    }

    let notification = state.dashboard.notify(req.message, req.severity).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// DELETE /api/v1/notifications/:id
pub async fn dismiss_notification(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.dashboard.dismiss(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
