//! Global Application State
//!
//! Reactive state management using Leptos signals. The server owns the
//! dashboard; this module holds the last rendered view and folds pushed
//! events into it.

use leptos::*;
use serde::Deserialize;
use std::collections::HashMap;

/// Global application state provided to all components
#[derive(Clone)]
pub struct GlobalState {
    /// Last full view fetched from the API, patched by live events
    pub view: RwSignal<Option<DashboardView>>,
    /// Chart configurations keyed by mount id (e.g. "powerChart")
    pub charts: RwSignal<HashMap<String, ChartConfig>>,
    /// WebSocket connection status
    pub ws_connected: RwSignal<bool>,
    /// Timestamp of the last pushed update
    pub last_update: RwSignal<Option<i64>>,
    /// Global loading state
    pub loading: RwSignal<bool>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
}

// ============ Server view ============

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DashboardView {
    pub active_panel: Option<String>,
    pub panels: Vec<PanelView>,
    pub charts: Vec<String>,
    pub layout: Layout,
    pub uploads: UploadsView,
    pub notifications: Vec<Notification>,
    pub metrics: Vec<Readout>,
    pub logs: LogsView,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PanelView {
    pub id: String,
    pub title: String,
    pub href: String,
    pub active: bool,
    pub nav_highlighted: bool,
    #[serde(default)]
    pub charts: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Layout {
    pub viewport_width: u32,
    pub breakpoint: u32,
    pub sidebar_open: bool,
    pub mobile_menu_button: bool,
    pub drop_zone_highlighted: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct UploadsView {
    pub in_progress: Vec<ProgressView>,
    pub files: Vec<UploadedFile>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ProgressView {
    pub id: u64,
    pub name: String,
    pub percent: f64,
    pub label: String,
}

impl ProgressView {
    fn new(id: u64, name: String, percent: f64) -> Self {
        let label = if percent >= 100.0 {
            format!("{} - Upload Complete", name)
        } else {
            format!("{} - Uploading...", name)
        };
        Self { id, name, percent, label }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub file_type: String,
    pub size: String,
    pub uploaded_at: String,
    pub status: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Readout {
    pub reading: String,
    pub label: String,
    pub value: f64,
    pub text: String,
    pub unit: String,
}

#[derive(Clone, Debug, Deserialize, serde::Serialize, PartialEq)]
pub struct FilterSelection {
    pub event_type: String,
    pub severity: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LogsView {
    pub selection: FilterSelection,
    pub event_options: Vec<String>,
    pub severity_options: Vec<String>,
    pub visible_count: usize,
    pub rows: Vec<LogRow>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct LogRow {
    pub timestamp: String,
    pub event_type: String,
    pub severity: String,
    pub source: String,
    pub message: String,
    pub visible: bool,
}

// ============ Charts ============

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChartInstance {
    pub mount: String,
    pub config: ChartConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One color for the whole dataset or one per point
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Paint {
    Solid(String),
    PerPoint(Vec<String>),
}

impl Paint {
    pub fn at(&self, index: usize) -> &str {
        match self {
            Paint::Solid(c) => c,
            Paint::PerPoint(colors) if colors.is_empty() => "#e2e8f0",
            Paint::PerPoint(colors) => &colors[index % colors.len()],
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Paint,
    pub background_color: Paint,
    #[serde(default)]
    pub border_width: Option<f64>,
    #[serde(default)]
    pub fill: Option<bool>,
    #[serde(default, rename = "yAxisID")]
    pub y_axis_id: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChartOptions {
    #[serde(default)]
    pub scales: HashMap<String, AxisOptions>,
    pub plugins: Plugins,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    #[serde(default)]
    pub display: Option<bool>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub begin_at_zero: Option<bool>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub grid: GridOptions,
    #[serde(default)]
    pub ticks: TickOptions,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub draw_on_chart_area: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TickOptions {
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Legend {
    pub display: bool,
}

// ============ Live events ============

/// Change pushed by the server on a `dashboard.*` topic
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DashboardEvent {
    SectionShown {
        requested: String,
        active: Option<String>,
    },
    ChartInitialized {
        mount: String,
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
        #[serde(default)]
        expired: bool,
    },
    MetricsUpdated {
        readouts: Vec<Readout>,
    },
    LogFilterChanged {
        selection: FilterSelection,
        visible: usize,
    },
    LayoutChanged {
        layout: Layout,
    },
    #[serde(other)]
    Unknown,
}

/// Work left after an event has been folded into the view
#[derive(Clone, Debug, PartialEq)]
pub enum FollowUp {
    None,
    /// The change touches more than the event carries
    RefetchView,
    FetchChart(String),
}

/// Fold one pushed event into the cached view
pub fn apply_event(view: &mut DashboardView, event: DashboardEvent) -> FollowUp {
    match event {
        DashboardEvent::SectionShown { .. } | DashboardEvent::LogFilterChanged { .. } => {
            FollowUp::RefetchView
        }
        DashboardEvent::ChartInitialized { mount } => {
            if !view.charts.contains(&mount) {
                view.charts.push(mount.clone());
            }
            FollowUp::FetchChart(mount)
        }
        DashboardEvent::UploadStarted { upload_id, name } => {
            upsert_progress(view, ProgressView::new(upload_id, name, 0.0));
            FollowUp::None
        }
        DashboardEvent::UploadProgress { upload_id, name, percent } => {
            upsert_progress(view, ProgressView::new(upload_id, name, percent));
            FollowUp::None
        }
        DashboardEvent::UploadCompleted { upload_id, file } => {
            view.uploads.in_progress.retain(|p| p.id != upload_id);
            view.uploads.files.push(file);
            FollowUp::None
        }
        DashboardEvent::NotificationShown { notification } => {
            if !view.notifications.iter().any(|n| n.id == notification.id) {
                view.notifications.push(notification);
            }
            FollowUp::None
        }
        DashboardEvent::NotificationDismissed { id, .. } => {
            view.notifications.retain(|n| n.id != id);
            FollowUp::None
        }
        DashboardEvent::MetricsUpdated { readouts } => {
            view.metrics = readouts;
            FollowUp::None
        }
        DashboardEvent::LayoutChanged { layout } => {
            view.layout = layout;
            FollowUp::None
        }
        DashboardEvent::Unknown => FollowUp::None,
    }
}

fn upsert_progress(view: &mut DashboardView, progress: ProgressView) {
    match view.uploads.in_progress.iter_mut().find(|p| p.id == progress.id) {
        Some(existing) => *existing = progress,
        None => view.uploads.in_progress.push(progress),
    }
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        view: create_rw_signal(None),
        charts: create_rw_signal(HashMap::new()),
        ws_connected: create_rw_signal(false),
        last_update: create_rw_signal(None),
        loading: create_rw_signal(false),
        error: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Readout for a reading key such as "voltage"
    pub fn readout(&self, reading: &str) -> Option<Readout> {
        self.view
            .get()
            .and_then(|v| v.metrics.into_iter().find(|r| r.reading == reading))
    }

    /// Replace the cached view with a fresh one from the API
    pub fn refresh(&self) {
        let state = self.clone();
        spawn_local(async move {
            state.loading.set(true);
            match crate::api::fetch_view().await {
                Ok(view) => state.view.set(Some(view)),
                Err(e) => state.show_error(&e),
            }
            state.loading.set(false);
        });
    }

    /// Load the configuration of a constructed chart
    pub fn load_chart(&self, mount: String) {
        let charts = self.charts;
        let state = self.clone();
        spawn_local(async move {
            match crate::api::fetch_chart(&mount).await {
                Ok(instance) => charts.update(|c| {
                    c.insert(instance.mount, instance.config);
                }),
                Err(e) => state.show_error(&e),
            }
        });
    }

    /// Fold a pushed event into the view and run any follow-up
    pub fn apply(&self, event: DashboardEvent) {
        let mut follow_up = FollowUp::None;
        self.view.update(|view| {
            if let Some(view) = view.as_mut() {
                follow_up = apply_event(view, event);
            }
        });
        self.last_update.set(Some(chrono::Utc::now().timestamp_millis()));

        match follow_up {
            FollowUp::None => {}
            FollowUp::RefetchView => self.refresh(),
            FollowUp::FetchChart(mount) => self.load_chart(mount),
        }
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_view() -> DashboardView {
        serde_json::from_value(serde_json::json!({
            "active_panel": "dashboard",
            "panels": [
                {"id": "dashboard", "title": "Dashboard", "href": "#dashboard",
                 "active": true, "nav_highlighted": true, "charts": ["powerChart"]}
            ],
            "charts": ["powerChart"],
            "layout": {"viewport_width": 1280, "breakpoint": 768, "sidebar_open": false,
                       "mobile_menu_button": false, "drop_zone_highlighted": false},
            "uploads": {"in_progress": [], "files": []},
            "notifications": [],
            "metrics": [
                {"reading": "voltage", "label": "Voltage", "value": 230.0, "text": "230.0", "unit": "V"}
            ],
            "logs": {
                "selection": {"event_type": "All Events", "severity": "All Severities"},
                "event_options": ["All Events", "Voltage Sag"],
                "severity_options": ["All Severities", "Critical"],
                "visible_count": 1,
                "rows": [
                    {"timestamp": "2024-01-15 14:32:15", "event_type": "Voltage Sag",
                     "severity": "Critical", "source": "Bus 3", "message": "Dip", "visible": true}
                ]
            }
        }))
        .unwrap()
    }

    fn event(value: serde_json::Value) -> DashboardEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_upload_events_track_progress() {
        let mut view = sample_view();

        apply_event(&mut view, event(serde_json::json!(
            {"kind": "upload_started", "upload_id": 1, "name": "a.csv"}
        )));
        apply_event(&mut view, event(serde_json::json!(
            {"kind": "upload_progress", "upload_id": 1, "name": "a.csv", "percent": 100.0}
        )));
        assert_eq!(view.uploads.in_progress.len(), 1);
        assert_eq!(view.uploads.in_progress[0].label, "a.csv - Upload Complete");

        apply_event(&mut view, event(serde_json::json!({
            "kind": "upload_completed", "upload_id": 1,
            "file": {"name": "a.csv", "file_type": "CSV", "size": "1.5 KB",
                     "size_bytes": 1536, "uploaded_at": "now", "status": "Completed"}
        })));
        assert!(view.uploads.in_progress.is_empty());
        assert_eq!(view.uploads.files[0].size, "1.5 KB");
    }

    #[test]
    fn test_notification_events() {
        let mut view = sample_view();
        let shown = serde_json::json!({
            "kind": "notification_shown",
            "notification": {"id": 4, "message": "hi", "severity": "info",
                             "created_at": "2024-01-01T00:00:00Z"}
        });

        apply_event(&mut view, event(shown.clone()));
        apply_event(&mut view, event(shown));
        assert_eq!(view.notifications.len(), 1);

        apply_event(&mut view, event(serde_json::json!(
            {"kind": "notification_dismissed", "id": 4, "expired": true}
        )));
        assert!(view.notifications.is_empty());
    }

    #[test]
    fn test_follow_ups() {
        let mut view = sample_view();

        let follow = apply_event(&mut view, event(serde_json::json!(
            {"kind": "section_shown", "requested": "logs", "active": "logs"}
        )));
        assert_eq!(follow, FollowUp::RefetchView);

        let follow = apply_event(&mut view, event(serde_json::json!(
            {"kind": "chart_initialized", "mount": "trainingChart"}
        )));
        assert_eq!(follow, FollowUp::FetchChart("trainingChart".to_string()));
        assert_eq!(view.charts, vec!["powerChart", "trainingChart"]);

        let follow = apply_event(&mut view, event(serde_json::json!({"kind": "brand_new"})));
        assert_eq!(follow, FollowUp::None);
    }

    #[test]
    fn test_metrics_replace_readouts() {
        let mut view = sample_view();
        apply_event(&mut view, event(serde_json::json!({
            "kind": "metrics_updated",
            "sample": {"voltage": 231.0},
            "readouts": [
                {"reading": "voltage", "label": "Voltage", "value": 231.04, "text": "231.0", "unit": "V"}
            ]
        })));
        assert_eq!(view.metrics[0].text, "231.0");
    }

    #[test]
    fn test_paint_per_point() {
        let paint = Paint::PerPoint(vec!["#a".to_string(), "#b".to_string()]);
        assert_eq!(paint.at(3), "#b");
        assert_eq!(Paint::Solid("#c".to_string()).at(9), "#c");
    }
}
