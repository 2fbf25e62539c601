//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod log_table;
pub mod metric_card;
pub mod sidebar;
pub mod toast;
pub mod upload;

pub use chart::ChartCanvas;
pub use log_table::{LogFilters, LogTable};
pub use metric_card::MetricCard;
pub use sidebar::{MenuButton, Sidebar};
pub use toast::ToastStack;
pub use upload::{DropZone, UploadProgressList, UploadedFilesTable};
