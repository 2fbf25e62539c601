//! Chart Routes
//!
//! - GET /api/v1/charts - Every constructed chart
//! - GET /api/v1/charts/:mount - One chart by element id (e.g. `powerChart`)

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::ChartListResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{ChartInstance, ChartMount};

/// GET /api/v1/charts
pub async fn list_charts(State(state): State<Arc<AppState>>) -> Json<ChartListResponse> {
    let charts = state.dashboard.charts().await;
    Json(ChartListResponse {
        total: charts.len(),
        charts,
    })
}

/// GET /api/v1/charts/:mount
///
/// 404 both for unknown mounts and for charts whose panel was never shown.
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(mount): Path<String>,
) -> ApiResult<Json<ChartInstance>> {
    let mount: ChartMount = mount.parse()?;

    state
        .dashboard
        .chart(mount)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Chart {} has not been initialized", mount)))
}
