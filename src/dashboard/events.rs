//! Dashboard change events
//!
//! Every state change is published on a broadcast channel so that the
//! WebSocket layer (or a test) can follow along without polling.

use serde::Serialize;

use super::charts::ChartMount;
use super::layout::Layout;
use super::logs::FilterSelection;
use super::metrics::{MetricSample, Readout};
use super::notify::Notification;
use super::upload::UploadedFile;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// A panel was activated, or everything was cleared for an unknown id
    SectionShown {
        requested: String,
        active: Option<String>,
    },
    ChartInitialized {
        mount: ChartMount,
    },
    UploadStarted {
        upload_id: u64,
        name: String,
    },
    UploadProgress {
        upload_id: u64,
        name: String,
        percent: f64,
    },
    UploadCompleted {
        upload_id: u64,
        file: UploadedFile,
    },
    NotificationShown {
        notification: Notification,
    },
    NotificationDismissed {
        id: u64,
        /// True when dismissed by the expiry timer rather than by a user
        expired: bool,
    },
    MetricsUpdated {
        sample: MetricSample,
        readouts: Vec<Readout>,
    },
    LogFilterChanged {
        selection: FilterSelection,
        visible: usize,
    },
    LayoutChanged {
        layout: Layout,
    },
}

impl DashboardEvent {
    /// Topic suffix used for WebSocket routing
    pub fn channel(&self) -> &'static str {
        match self {
            DashboardEvent::SectionShown { .. } | DashboardEvent::ChartInitialized { .. } => "view",
            DashboardEvent::UploadStarted { .. }
            | DashboardEvent::UploadProgress { .. }
            | DashboardEvent::UploadCompleted { .. } => "uploads",
            DashboardEvent::NotificationShown { .. } | DashboardEvent::NotificationDismissed { .. } => {
                "notifications"
            }
            DashboardEvent::MetricsUpdated { .. } => "metrics",
            DashboardEvent::LogFilterChanged { .. } => "logs",
            DashboardEvent::LayoutChanged { .. } => "layout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = DashboardEvent::UploadProgress {
            upload_id: 4,
            name: "reading.csv".to_string(),
            percent: 42.5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "upload_progress");
        assert_eq!(json["percent"], 42.5);
        assert_eq!(event.channel(), "uploads");
    }

    #[test]
    fn test_chart_event_uses_element_id() {
        let event = DashboardEvent::ChartInitialized {
            mount: ChartMount::Training,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["mount"], "trainingChart");
        assert_eq!(event.channel(), "view");
    }
}
