//! Headless Power Quality Dashboard
//!
//! The dashboard is modelled as explicit state plus a pure render step:
//!
//! - [`DashboardState`] holds panels, charts, uploads, toasts, readings,
//!   the event log and the responsive layout
//! - [`render`] turns state into a serializable [`DashboardView`]
//! - [`Dashboard`] wraps the state for concurrent use, owns every timer
//!   (upload progress, toast expiry, metrics ticker) and publishes a
//!   [`DashboardEvent`] per change
//!
//! ## Example
//!
//! ```rust,no_run
//! use gridscope::config::DashboardConfig;
//! use gridscope::dashboard::{Dashboard, FileDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dashboard = Dashboard::new(DashboardConfig::default());
//!     dashboard.start().await?;
//!
//!     let receipt = dashboard
//!         .handle_files(vec![FileDescriptor::new("reading.csv", 1536)])
//!         .await?;
//!     println!("{} upload(s) started", receipt.accepted.len());
//!
//!     dashboard.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod charts;
mod engine;
mod error;
pub mod events;
pub mod layout;
pub mod logs;
pub mod metrics;
pub mod notify;
pub mod panel;
mod state;
pub mod tasks;
pub mod upload;

pub use charts::{ChartConfig, ChartInstance, ChartMount, ChartRegistry};
pub use engine::Dashboard;
pub use error::{DashboardError, DashboardResult};
pub use events::DashboardEvent;
pub use layout::Layout;
pub use logs::{FilterSelection, LogEntry, LogFilter, LogTable};
pub use metrics::{MetricSample, Reading, Readout};
pub use notify::{Notification, NotificationCenter, Severity};
pub use panel::{Panel, PanelId, PanelRegistry};
pub use state::{
    render, DashboardState, DashboardView, LogRowView, LogsView, PanelView, ProgressView,
    SectionChange, UploadsView,
};
pub use tasks::{TaskKey, TaskRegistry};
pub use upload::{
    format_file_size, format_upload_time, AcceptedUpload, FileDescriptor, UploadPolicy,
    UploadProgress, UploadReceipt, UploadedFile, INVALID_TYPE_MESSAGE, UPLOAD_SUCCESS_MESSAGE,
};
