//! Dashboard state and rendering
//!
//! [`DashboardState`] is the single owner of everything the dashboard shows.
//! Transitions that involve no timers (section switching, filters, layout)
//! are plain methods here; [`render`] turns a state into the serializable
//! [`DashboardView`] handed to clients.

use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;

use super::charts::{ChartMount, ChartRegistry};
use super::layout::Layout;
use super::logs::{FilterSelection, LogEntry, LogFilter, LogTable};
use super::metrics::{MetricSample, Readout};
use super::notify::{Notification, NotificationCenter};
use super::panel::{PanelId, PanelRegistry};
use super::upload::{UploadProgress, UploadedFile};

/// Everything the dashboard displays
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub panels: PanelRegistry,
    pub active_panel: Option<PanelId>,
    pub highlighted_nav: Option<PanelId>,
    pub charts: ChartRegistry,
    pub uploads_in_flight: BTreeMap<u64, UploadProgress>,
    pub uploaded: Vec<UploadedFile>,
    pub notifications: NotificationCenter,
    pub metrics: MetricSample,
    pub logs: LogTable,
    pub layout: Layout,
    next_upload_id: u64,
}

/// Result of a View Router activation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionChange {
    pub requested: String,
    /// None when the identifier matched no panel
    pub active: Option<PanelId>,
    /// Charts constructed by this activation (empty when already present)
    pub charts_constructed: Vec<ChartMount>,
}

impl DashboardState {
    pub fn new(panels: PanelRegistry, logs: Vec<LogEntry>, layout: Layout) -> Self {
        Self {
            panels,
            active_panel: None,
            highlighted_nav: None,
            charts: ChartRegistry::new(),
            uploads_in_flight: BTreeMap::new(),
            uploaded: Vec::new(),
            notifications: NotificationCenter::new(),
            metrics: MetricSample::baseline(),
            logs: LogTable::new(logs),
            layout,
            next_upload_id: 1,
        }
    }

    /// Deactivate every panel and nav item, then activate `id` and build its charts.
    ///
    /// An unknown `id` leaves nothing active.
    pub fn show_section<R: Rng + ?Sized>(&mut self, id: &str, rng: &mut R) -> SectionChange {
        self.active_panel = None;
        self.highlighted_nav = None;

        let mut charts_constructed = Vec::new();

        if let Some(panel) = self.panels.get(id) {
            let panel_id = panel.id.clone();
            let mounts = panel.charts.clone();

            self.active_panel = Some(panel_id.clone());
            self.highlighted_nav = Some(panel_id);

            for mount in mounts {
                if self.charts.ensure(mount, rng) {
                    charts_constructed.push(mount);
                }
            }
        }

        SectionChange {
            requested: id.to_string(),
            active: self.active_panel.clone(),
            charts_constructed,
        }
    }

    /// Register a new in-flight upload and return its id
    pub fn begin_upload(&mut self, name: &str) -> u64 {
        let id = self.next_upload_id;
        self.next_upload_id += 1;
        self.uploads_in_flight.insert(id, UploadProgress::new(id, name));
        id
    }

    pub fn set_log_filter(&mut self, filter: LogFilter) -> FilterSelection {
        self.logs.set_filter(filter);
        self.logs.filter().selection()
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(PanelRegistry::default(), super::logs::seed_entries(), Layout::default())
    }
}

// ============================================
// Rendered view
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub active_panel: Option<String>,
    pub panels: Vec<PanelView>,
    /// Mount points that currently carry a chart
    pub charts: Vec<ChartMount>,
    pub layout: Layout,
    pub uploads: UploadsView,
    pub notifications: Vec<Notification>,
    pub metrics: Vec<Readout>,
    pub logs: LogsView,
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelView {
    pub id: String,
    pub title: String,
    pub href: String,
    pub active: bool,
    pub nav_highlighted: bool,
    pub charts: Vec<ChartMount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadsView {
    pub in_progress: Vec<ProgressView>,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub id: u64,
    pub name: String,
    pub percent: f64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogsView {
    pub selection: FilterSelection,
    pub event_options: Vec<String>,
    pub severity_options: Vec<String>,
    pub visible_count: usize,
    pub rows: Vec<LogRowView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogRowView {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub visible: bool,
}

/// Render the full view from state. Pure: no clocks, no randomness.
pub fn render(state: &DashboardState) -> DashboardView {
    let panels = state
        .panels
        .iter()
        .map(|p| PanelView {
            id: p.id.to_string(),
            title: p.title.clone(),
            href: p.id.href(),
            active: state.active_panel.as_ref() == Some(&p.id),
            nav_highlighted: state.highlighted_nav.as_ref() == Some(&p.id),
            charts: p.charts.clone(),
        })
        .collect();

    let in_progress = state
        .uploads_in_flight
        .values()
        .map(|u| ProgressView {
            id: u.id,
            name: u.name.clone(),
            percent: u.percent,
            label: u.label(),
        })
        .collect();

    DashboardView {
        active_panel: state.active_panel.as_ref().map(|p| p.to_string()),
        panels,
        charts: state.charts.mounts(),
        layout: state.layout.clone(),
        uploads: UploadsView {
            in_progress,
            files: state.uploaded.clone(),
        },
        notifications: state.notifications.active().to_vec(),
        metrics: state.metrics.readouts(),
        logs: render_logs(&state.logs),
    }
}

fn render_logs(logs: &LogTable) -> LogsView {
    let rows = logs
        .entries()
        .iter()
        .zip(logs.visibility())
        .map(|(entry, visible)| LogRowView {
            entry: entry.clone(),
            visible,
        })
        .collect();

    LogsView {
        selection: logs.filter().selection(),
        event_options: logs.event_options(),
        severity_options: logs.severity_options(),
        visible_count: logs.visible_count(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn active_count(view: &DashboardView) -> (usize, usize) {
        (
            view.panels.iter().filter(|p| p.active).count(),
            view.panels.iter().filter(|p| p.nav_highlighted).count(),
        )
    }

    #[test]
    fn test_exactly_one_active_panel() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = DashboardState::default();
        let ids: Vec<String> = state.panels.iter().map(|p| p.id.to_string()).collect();

        for id in &ids {
            state.show_section(id, &mut rng);
            let view = render(&state);
            assert_eq!(active_count(&view), (1, 1));
            assert_eq!(view.active_panel.as_deref(), Some(id.as_str()));
        }
    }

    #[test]
    fn test_charts_built_once() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = DashboardState::default();

        let first = state.show_section("insights", &mut rng);
        assert_eq!(first.charts_constructed, vec![ChartMount::Training, ChartMount::Feature]);

        let second = state.show_section("insights", &mut rng);
        assert!(second.charts_constructed.is_empty());
        assert_eq!(state.charts.constructions(), 2);

        state.show_section("dashboard", &mut rng);
        state.show_section("dashboard", &mut rng);
        assert_eq!(state.charts.constructions(), 3);
        assert_eq!(render(&state).charts.len(), 3);
    }

    #[test]
    fn test_unknown_section_clears_everything() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = DashboardState::default();
        state.show_section("logs", &mut rng);

        let change = state.show_section("settings", &mut rng);
        assert_eq!(change.active, None);
        assert!(change.charts_constructed.is_empty());

        let view = render(&state);
        assert_eq!(active_count(&view), (0, 0));
        assert!(view.active_panel.is_none());
    }

    #[test]
    fn test_render_logs_and_uploads() {
        let mut state = DashboardState::default();
        state.set_log_filter(LogFilter::from_dropdowns("Voltage Sag", "All Severities"));
        let id = state.begin_upload("reading.csv");

        let view = render(&state);
        assert_eq!(view.logs.visible_count, 2);
        assert_eq!(view.logs.rows.iter().filter(|r| r.visible).count(), 2);
        assert_eq!(view.uploads.in_progress[0].id, id);
        assert_eq!(view.uploads.in_progress[0].label, "reading.csv - Uploading...");
        assert_eq!(view.metrics[0].text, "230.0");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["logs"]["rows"][0]["event_type"], "Voltage Sag");
        assert_eq!(json["logs"]["selection"]["severity"], "All Severities");
    }
}
