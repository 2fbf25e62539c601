//! # GridScope
//!
//! Power quality monitoring dashboard served from a headless Rust engine.
//! Panels, charts, simulated uploads, toasts, live readings and the event
//! log are kept as server-side state, exposed over a REST API and streamed
//! to browsers over WebSocket.
//!
//! ## Modules
//!
//! - [`dashboard`]: State, rendering and the timer-driven engine
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Topic-based live updates
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridscope::{build_router, AppState, Config, Dashboard};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let dashboard = Dashboard::new(config.dashboard.clone());
//!     dashboard.start().await?;
//!
//!     let state = Arc::new(AppState::new(dashboard, config.api.clone()));
//!     let _app = build_router(state);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod websocket;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, DashboardConfig, LoggingConfig};

pub use dashboard::{
    render, ChartMount, Dashboard, DashboardError, DashboardEvent, DashboardResult,
    DashboardState, DashboardView, FileDescriptor, FilterSelection, MetricSample, Notification,
    Severity, UploadReceipt, UploadedFile,
};

pub use websocket::{
    websocket_handler, ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, WsEvent,
};
