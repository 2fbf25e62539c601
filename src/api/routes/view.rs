//! View Routes
//!
//! - GET /api/v1/view - Full rendered dashboard
//! - POST /api/v1/sections/:id - Activate a panel

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::dashboard::{DashboardView, SectionChange};

/// GET /api/v1/view
pub async fn get_view(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.dashboard.view().await)
}

/// POST /api/v1/sections/:id
///
/// An identifier that names no panel is not an error: every panel is
/// deactivated and `active` comes back null.
pub async fn show_section(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<SectionChange> {
    Json(state.dashboard.show_section(&id).await)
}
