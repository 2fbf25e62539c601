//! Pages
//!
//! Content panels, one per sidebar entry.

pub mod dashboard;
pub mod insights;
pub mod logs;
pub mod upload;

pub use dashboard::Dashboard;
pub use insights::Insights;
pub use logs::Logs;
pub use upload::Upload;
