//! Dashboard engine error types

use thiserror::Error;

/// Errors that can occur in the dashboard engine
#[derive(Error, Debug)]
pub enum DashboardError {
    /// No notification with this id is currently displayed
    #[error("Notification not found: {0}")]
    NotificationNotFound(u64),

    /// The requested chart mount point does not exist
    #[error("Unknown chart mount: {0}")]
    UnknownChartMount(String),

    /// File descriptor could not be accepted at all
    #[error("Invalid file descriptor: {0}")]
    InvalidFile(String),

    /// Engine was shut down and no longer schedules work
    #[error("Dashboard has been shut down")]
    ShutDown,
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DashboardError::NotificationNotFound(7);
        assert_eq!(err.to_string(), "Notification not found: 7");

        let err = DashboardError::UnknownChartMount("gaugeChart".to_string());
        assert_eq!(err.to_string(), "Unknown chart mount: gaugeChart");
    }
}
