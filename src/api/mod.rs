//! GridScope REST API
//!
//! HTTP API layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## View
//! - `GET /api/v1/view` - Rendered dashboard
//! - `POST /api/v1/sections/:id` - Activate a panel
//!
//! ## Uploads
//! - `GET /api/v1/uploads` - Uploaded-files table
//! - `POST /api/v1/uploads` - Submit file descriptors
//! - `POST /api/v1/uploads/drag-over` - Highlight the drop zone
//!
//! ## Notifications
//! - `GET /api/v1/notifications` - Displayed toasts
//! - `POST /api/v1/notifications` - Show a toast
//! - `DELETE /api/v1/notifications/:id` - Dismiss a toast
//!
//! ## Readings, logs, charts
//! - `GET /api/v1/metrics/latest` - Current readings
//! - `GET /api/v1/logs` - Event log with visibility
//! - `PUT /api/v1/logs/filter` - Change the filter
//! - `GET /api/v1/charts` - Constructed charts
//! - `GET /api/v1/charts/:mount` - One chart
//!
//! ## Layout
//! - `POST /api/v1/layout/resize` - Viewport width changed
//! - `POST /api/v1/layout/sidebar/toggle` - Toggle the mobile sidebar
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /api/v1/ws` - Real-time streaming connection
//!
//! # Example
//!
//! ```rust,ignore
//! use gridscope::api::{serve, AppState};
//! use gridscope::config::Config;
//! use gridscope::dashboard::Dashboard;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let dashboard = Dashboard::new(config.dashboard.clone());
//!     dashboard.start().await?;
//!
//!     serve(AppState::new(dashboard, config.api.clone())).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::websocket::{websocket_handler, WsEvent};

/// Build the API router with all routes and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // View router
        .route("/view", get(routes::view::get_view))
        .route("/sections/:id", post(routes::view::show_section))
        // Upload simulator
        .route("/uploads", get(routes::uploads::list_uploads))
        .route("/uploads", post(routes::uploads::submit_files))
        .route("/uploads/drag-over", post(routes::uploads::drag_over))
        // Notifications
        .route("/notifications", get(routes::notifications::list_notifications))
        .route("/notifications", post(routes::notifications::create_notification))
        .route("/notifications/:id", delete(routes::notifications::dismiss_notification))
        // Readings, logs and charts
        .route("/metrics/latest", get(routes::metrics::latest_metrics))
        .route("/logs", get(routes::logs::list_logs))
        .route("/logs/filter", put(routes::logs::set_filter))
        .route("/charts", get(routes::charts::list_charts))
        .route("/charts/:mount", get(routes::charts::get_chart))
        // Layout
        .route("/layout/resize", post(routes::layout::resize))
        .route("/layout/sidebar/toggle", post(routes::layout::toggle_sidebar))
        // WebSocket route
        .route("/ws", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(&state.config);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server, relay dashboard events to WebSocket clients and
/// stop the dashboard's timers on shutdown.
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let state = Arc::new(state);
    let relay = state.forward_events();
    let router = build_router(Arc::clone(&state));

    let addr = state.config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("GridScope API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(announce_shutdown(Arc::clone(&state), shutdown_signal()))
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    let aborted = state.dashboard.shutdown().await;
    relay.abort();

    tracing::info!(aborted_tasks = aborted, "GridScope API shut down gracefully");
    Ok(())
}

/// Wait for `signal`, then tell WebSocket clients while connections are still open
async fn announce_shutdown(state: Arc<AppState>, signal: impl std::future::Future<Output = ()>) {
    signal.await;
    let reached = state.ws_hub.broadcast(&WsEvent::system("Server shutting down")).await;
    tracing::debug!(clients = reached, "Shutdown notice sent");
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::Dashboard;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, Arc<AppState>) {
        let dashboard = Dashboard::new(DashboardConfig {
            rng_seed: Some(7),
            ..Default::default()
        });
        let state = Arc::new(AppState::new(dashboard, ApiConfig::default()));
        (build_router(Arc::clone(&state)), state)
    }

    #[tokio::test]
    async fn test_shutdown_notice_reaches_system_subscribers() {
        let (_app, state) = create_test_app();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let id = state.ws_hub.register(tx).await.unwrap();
        state
            .ws_hub
            .subscribe(&id, vec!["system".to_string()])
            .await
            .unwrap();

        announce_shutdown(Arc::clone(&state), async {}).await;

        match rx.try_recv() {
            Ok(crate::websocket::ServerMessage::System { message }) => {
                assert_eq!(message, "Server shutting down");
            }
            other => panic!("Expected system notice, got {:?}", other),
        }
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send_json(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get("/health/live")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_until_shutdown() {
        let (app, state) = create_test_app();

        let response = app.clone().oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        state.dashboard.shutdown().await;
        let response = app.oneshot(get("/health/ready")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _) = create_test_app();
        let response = app.oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["ws_connections"], 0);
    }

    #[tokio::test]
    async fn test_show_section_and_view() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(send_json("POST", "/api/v1/sections/insights", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["active"], "insights");
        assert_eq!(body["charts_constructed"][0], "trainingChart");

        let body = json_body(app.clone().oneshot(get("/api/v1/view")).await.unwrap()).await;
        assert_eq!(body["active_panel"], "insights");

        let response = app.oneshot(get("/api/v1/charts/featureChart")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["config"]["type"], "bar");
    }

    #[tokio::test]
    async fn test_unknown_section_clears_active_panel() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(send_json("POST", "/api/v1/sections/settings", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(json_body(response).await["active"].is_null());
    }

    #[tokio::test]
    async fn test_chart_errors() {
        let (app, _) = create_test_app();

        let response = app.clone().oneshot(get("/api/v1/charts/gaugeChart")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "CHART_NOT_FOUND");

        // Known mount, panel never shown
        let response = app.oneshot(get("/api/v1/charts/powerChart")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_files() {
        let (app, state) = create_test_app();

        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/v1/uploads",
                r#"{"files": [{"name": "reading.csv", "size": 1536}, {"name": "data.xlsx", "size": 10}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let body = json_body(response).await;
        assert_eq!(body["accepted"][0]["name"], "reading.csv");
        assert_eq!(body["rejected"][0], "data.xlsx");

        let notes = state.dashboard.notifications().await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, crate::dashboard::INVALID_TYPE_MESSAGE);

        let response = app
            .oneshot(send_json("POST", "/api/v1/uploads", r#"{"files": []}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_invalid_json() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(send_json("POST", "/api/v1/uploads", "not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_notification_lifecycle() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(send_json(
                "POST",
                "/api/v1/notifications",
                r#"{"message": "Model retrained", "severity": "success"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json_body(response).await["id"].as_u64().unwrap();

        let body = json_body(app.clone().oneshot(get("/api/v1/notifications")).await.unwrap()).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["notifications"][0]["severity"], "success");

        let uri = format!("/api/v1/notifications/{}", id);
        let response = app
            .clone()
            .oneshot(Request::builder().method("DELETE").uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(Request::builder().method("DELETE").uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_empty_notification_rejected() {
        let (app, _) = create_test_app();
        let response = app
            .oneshot(send_json("POST", "/api/v1/notifications", r#"{"message": "  "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_latest_metrics_baseline() {
        let (app, _) = create_test_app();
        let body = json_body(app.oneshot(get("/api/v1/metrics/latest")).await.unwrap()).await;

        assert_eq!(body["sample"]["voltage"], 230.0);
        assert_eq!(body["readouts"].as_array().unwrap().len(), 7);
        assert_eq!(body["readouts"][0]["text"], "230.0");
    }

    #[tokio::test]
    async fn test_log_filter() {
        let (app, _) = create_test_app();

        let response = app
            .clone()
            .oneshot(send_json("PUT", "/api/v1/logs/filter", r#"{"event_type": "Voltage Sag"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["selection"]["severity"], "All Severities");
        assert_eq!(body["visible"], 2);

        let body = json_body(app.oneshot(get("/api/v1/logs")).await.unwrap()).await;
        assert_eq!(body["visible_count"], 2);
        assert_eq!(body["event_options"][0], "All Events");
    }

    #[tokio::test]
    async fn test_layout_routes() {
        let (app, _) = create_test_app();

        let body = json_body(
            app.clone()
                .oneshot(send_json("POST", "/api/v1/layout/resize", r#"{"width": 500}"#))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["viewport_width"], 500);

        let body = json_body(
            app.clone()
                .oneshot(send_json("POST", "/api/v1/layout/sidebar/toggle", ""))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["sidebar_open"], true);

        let response = app
            .oneshot(send_json("POST", "/api/v1/layout/resize", r#"{"width": 0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
