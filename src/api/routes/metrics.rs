//! Metrics Routes
//!
//! - GET /api/v1/metrics/latest - Current readings

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::MetricsResponse;
use crate::api::state::AppState;

/// GET /api/v1/metrics/latest
///
/// Baseline values until the first tick has fired.
pub async fn latest_metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    let sample = state.dashboard.metrics().await;
    Json(MetricsResponse {
        readouts: sample.readouts(),
        sample,
    })
}
