//! Dashboard engine
//!
//! [`Dashboard`] owns the [`DashboardState`] behind a lock, drives every
//! timer through the [`TaskRegistry`] and publishes a [`DashboardEvent`] for
//! each change. It is cheap to clone; all clones share one dashboard.

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::time::{Instant, MissedTickBehavior};

use super::charts::{ChartInstance, ChartMount};
use super::error::{DashboardError, DashboardResult};
use super::events::DashboardEvent;
use super::layout::Layout;
use super::logs::{FilterSelection, LogFilter};
use super::metrics::MetricSample;
use super::notify::{Notification, Severity};
use super::state::{render, DashboardState, DashboardView, SectionChange};
use super::tasks::{TaskKey, TaskRegistry};
use super::upload::{
    AcceptedUpload, FileDescriptor, UploadPolicy, UploadReceipt, UploadedFile, INVALID_TYPE_MESSAGE,
    UPLOAD_SUCCESS_MESSAGE,
};
use crate::config::DashboardConfig;

struct DashboardInner {
    state: RwLock<DashboardState>,
    tasks: TaskRegistry,
    events: broadcast::Sender<DashboardEvent>,
    rng: Mutex<StdRng>,
    policy: UploadPolicy,
    config: DashboardConfig,
}

/// Shared handle to the running dashboard
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

impl Dashboard {
    /// Create a dashboard with the seeded log table and the configured layout
    pub fn new(config: DashboardConfig) -> Self {
        let state = DashboardState::new(
            Default::default(),
            super::logs::seed_entries(),
            Layout::new(config.initial_viewport_width, config.mobile_breakpoint_px),
        );
        Self::with_state(config, state)
    }

    pub fn with_state(mut config: DashboardConfig, state: DashboardState) -> Self {
        if let Err(e) = config.validate() {
            tracing::warn!(error = %e, "Falling back to the default upload step");
            config.upload_max_step = crate::config::default_upload_max_step();
        }
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            inner: Arc::new(DashboardInner {
                state: RwLock::new(state),
                tasks: TaskRegistry::new(),
                events,
                rng: Mutex::new(rng),
                policy: UploadPolicy::new(&config.allowed_extensions),
                config,
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.inner.policy
    }

    /// Subscribe to change events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.events.subscribe()
    }

    /// Show the default panel and arm the metrics ticker
    pub async fn start(&self) -> DashboardResult<SectionChange> {
        let default_panel = self.inner.config.default_panel.clone();
        let change = self.show_section(&default_panel).await;
        self.start_ticker().await?;

        tracing::info!(
            panel = %default_panel,
            interval_ms = self.inner.config.metrics_interval_ms,
            "Dashboard started"
        );
        Ok(change)
    }

    // ============================================
    // View router
    // ============================================

    /// Activate a panel, constructing its charts on first display
    pub async fn show_section(&self, id: &str) -> SectionChange {
        let change = {
            let mut state = self.inner.state.write().await;
            self.with_rng(|rng| state.show_section(id, rng))
        };

        match &change.active {
            Some(panel) => tracing::debug!(panel = %panel, "Section shown"),
            None => tracing::warn!(requested = %id, "Unknown section, nothing active"),
        }

        self.emit(DashboardEvent::SectionShown {
            requested: change.requested.clone(),
            active: change.active.as_ref().map(|p| p.to_string()),
        });
        for mount in &change.charts_constructed {
            tracing::debug!(mount = %mount, "Chart initialized");
            self.emit(DashboardEvent::ChartInitialized { mount: *mount });
        }

        change
    }

    pub async fn chart(&self, mount: ChartMount) -> Option<ChartInstance> {
        self.inner.state.read().await.charts.get(mount).cloned()
    }

    pub async fn charts(&self) -> Vec<ChartInstance> {
        self.inner.state.read().await.charts.instances().cloned().collect()
    }

    // ============================================
    // Upload simulator
    // ============================================

    /// Highlight the drop zone while files are dragged over it
    pub async fn drag_over(&self) -> Layout {
        self.update_layout(|layout| layout.drop_zone_highlighted = true).await
    }

    /// Validate and start simulated uploads for a batch of files.
    ///
    /// Each rejected file raises an error notification; each accepted file
    /// gets its own progress task. Submitting clears the drop-zone highlight.
    pub async fn handle_files(&self, files: Vec<FileDescriptor>) -> DashboardResult<UploadReceipt> {
        if self.inner.tasks.is_closed() {
            return Err(DashboardError::ShutDown);
        }
        if let Some(index) = files.iter().position(|f| f.name.trim().is_empty()) {
            return Err(DashboardError::InvalidFile(format!(
                "file at position {} has no name",
                index
            )));
        }

        let mut receipt = UploadReceipt::default();

        for file in files {
            if !self.inner.policy.accepts(&file) {
                tracing::warn!(file = %file.name, "Rejected upload, extension not allowed");
                receipt.rejected.push(file.name.clone());
                self.notify(INVALID_TYPE_MESSAGE, Severity::Error).await?;
                continue;
            }

            let id = self.inner.state.write().await.begin_upload(&file.name);
            tracing::info!(upload_id = id, file = %file.name, size = file.size, "Upload started");

            self.emit(DashboardEvent::UploadStarted {
                upload_id: id,
                name: file.name.clone(),
            });
            receipt.accepted.push(AcceptedUpload {
                id,
                name: file.name.clone(),
            });

            let dashboard = self.clone();
            let spawned = self
                .inner
                .tasks
                .spawn(TaskKey::Upload(id), async move {
                    dashboard.run_upload(id, file).await;
                })
                .await;
            if let Err(e) = spawned {
                self.inner.state.write().await.uploads_in_flight.remove(&id);
                return Err(e);
            }
        }

        if self.inner.state.read().await.layout.drop_zone_highlighted {
            self.update_layout(|layout| layout.drop_zone_highlighted = false).await;
        }

        Ok(receipt)
    }

    async fn run_upload(&self, id: u64, file: FileDescriptor) {
        let tick = Duration::from_millis(self.inner.config.upload_tick_ms);
        let max_step = self.inner.config.upload_max_step;

        loop {
            tokio::time::sleep(tick).await;

            let progress = {
                let mut state = self.inner.state.write().await;
                let Some(progress) = state.uploads_in_flight.get_mut(&id) else {
                    return;
                };
                self.with_rng(|rng| progress.advance(rng, max_step));
                progress.clone()
            };

            self.emit(DashboardEvent::UploadProgress {
                upload_id: id,
                name: progress.name,
                percent: progress.percent,
            });

            if progress.complete {
                break;
            }
        }

        tokio::time::sleep(Duration::from_millis(self.inner.config.upload_finish_delay_ms)).await;

        let uploaded = UploadedFile::completed(&file, chrono::Utc::now());
        {
            let mut state = self.inner.state.write().await;
            state.uploads_in_flight.remove(&id);
            state.uploaded.push(uploaded.clone());
        }

        tracing::info!(upload_id = id, file = %file.name, "Upload completed");
        self.emit(DashboardEvent::UploadCompleted {
            upload_id: id,
            file: uploaded,
        });

        if let Err(e) = self.notify(UPLOAD_SUCCESS_MESSAGE, Severity::Success).await {
            tracing::debug!(upload_id = id, error = %e, "Completion notice skipped");
        }
    }

    pub async fn uploads(&self) -> Vec<UploadedFile> {
        self.inner.state.read().await.uploaded.clone()
    }

    // ============================================
    // Notifications
    // ============================================

    /// Display a toast and arm its expiry timer
    pub async fn notify(
        &self,
        message: impl Into<String>,
        severity: Severity,
    ) -> DashboardResult<Notification> {
        if self.inner.tasks.is_closed() {
            return Err(DashboardError::ShutDown);
        }

        let notification = self.inner.state.write().await.notifications.push(message, severity);
        let id = notification.id;

        tracing::debug!(id, severity = %severity, message = %notification.message, "Notification shown");
        self.emit(DashboardEvent::NotificationShown {
            notification: notification.clone(),
        });

        let ttl = Duration::from_millis(self.inner.config.notification_ttl_ms);
        let dashboard = self.clone();
        self.inner
            .tasks
            .spawn(TaskKey::NotificationExpiry(id), async move {
                tokio::time::sleep(ttl).await;
                dashboard.expire(id).await;
            })
            .await?;

        Ok(notification)
    }

    /// Remove a toast before its timer fires
    pub async fn dismiss(&self, id: u64) -> DashboardResult<()> {
        if !self.inner.state.write().await.notifications.dismiss(id) {
            return Err(DashboardError::NotificationNotFound(id));
        }
        self.inner.tasks.cancel(TaskKey::NotificationExpiry(id)).await;

        self.emit(DashboardEvent::NotificationDismissed { id, expired: false });
        Ok(())
    }

    async fn expire(&self, id: u64) {
        if self.inner.state.write().await.notifications.dismiss(id) {
            self.emit(DashboardEvent::NotificationDismissed { id, expired: true });
        }
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.inner.state.read().await.notifications.active().to_vec()
    }

    // ============================================
    // Metrics ticker
    // ============================================

    /// Regenerate every live reading once
    pub async fn tick_metrics(&self) -> MetricSample {
        let sample = self.with_rng(MetricSample::generate);
        self.inner.state.write().await.metrics = sample;

        self.emit(DashboardEvent::MetricsUpdated {
            readouts: sample.readouts(),
            sample,
        });
        sample
    }

    /// Arm the periodic ticker; the first tick fires one period from now
    pub async fn start_ticker(&self) -> DashboardResult<()> {
        let period = Duration::from_millis(self.inner.config.metrics_interval_ms.max(1));
        let dashboard = self.clone();

        self.inner
            .tasks
            .spawn(TaskKey::MetricsTicker, async move {
                let mut interval = tokio::time::interval_at(Instant::now() + period, period);
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    interval.tick().await;
                    dashboard.tick_metrics().await;
                }
            })
            .await
    }

    pub async fn stop_ticker(&self) -> bool {
        self.inner.tasks.cancel(TaskKey::MetricsTicker).await
    }

    pub async fn metrics(&self) -> MetricSample {
        self.inner.state.read().await.metrics
    }

    // ============================================
    // Log filter
    // ============================================

    /// Apply dropdown values to the log table
    pub async fn set_log_filter(&self, selection: &FilterSelection) -> (FilterSelection, usize) {
        let (applied, visible) = {
            let mut state = self.inner.state.write().await;
            let applied = state.set_log_filter(LogFilter::from(selection));
            (applied, state.logs.visible_count())
        };

        tracing::debug!(event_type = %applied.event_type, severity = %applied.severity, visible, "Log filter changed");
        self.emit(DashboardEvent::LogFilterChanged {
            selection: applied.clone(),
            visible,
        });
        (applied, visible)
    }

    // ============================================
    // Layout
    // ============================================

    pub async fn resize(&self, width: u32) -> Layout {
        self.update_layout(|layout| layout.resize(width)).await
    }

    pub async fn toggle_sidebar(&self) -> Layout {
        self.update_layout(|layout| {
            layout.toggle_sidebar();
        })
        .await
    }

    pub async fn layout(&self) -> Layout {
        self.inner.state.read().await.layout.clone()
    }

    async fn update_layout(&self, f: impl FnOnce(&mut Layout)) -> Layout {
        let (before, after) = {
            let mut state = self.inner.state.write().await;
            let before = state.layout.clone();
            f(&mut state.layout);
            (before, state.layout.clone())
        };

        if before != after {
            self.emit(DashboardEvent::LayoutChanged {
                layout: after.clone(),
            });
        }
        after
    }

    // ============================================
    // Whole view and lifecycle
    // ============================================

    pub async fn view(&self) -> DashboardView {
        render(&*self.inner.state.read().await)
    }

    pub async fn task_count(&self) -> usize {
        self.inner.tasks.len().await
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.tasks.is_closed()
    }

    /// Cancel every timer. Returns how many were running.
    pub async fn shutdown(&self) -> usize {
        let aborted = self.inner.tasks.shutdown().await;
        // Aborted uploads will never finish
        self.inner.state.write().await.uploads_in_flight.clear();
        tracing::info!(aborted, "Dashboard shut down");
        aborted
    }

    fn emit(&self, event: DashboardEvent) {
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.inner.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::metrics::Reading;

    fn test_config() -> DashboardConfig {
        DashboardConfig {
            rng_seed: Some(42),
            ..Default::default()
        }
    }

    fn drain(rx: &mut broadcast::Receiver<DashboardEvent>) -> Vec<DashboardEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn wait_for_uploads(dashboard: &Dashboard, count: usize) {
        for _ in 0..200 {
            if dashboard.uploads().await.len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        panic!("uploads did not complete");
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_shows_default_panel() {
        let dashboard = Dashboard::new(test_config());
        let change = dashboard.start().await.unwrap();

        assert_eq!(change.active.unwrap().as_str(), "dashboard");
        assert_eq!(change.charts_constructed, vec![ChartMount::Power]);
        assert!(dashboard.chart(ChartMount::Power).await.is_some());
        assert!(dashboard.chart(ChartMount::Training).await.is_none());
        assert_eq!(dashboard.task_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_end_to_end() {
        let dashboard = Dashboard::new(test_config());
        let mut rx = dashboard.subscribe();

        dashboard.drag_over().await;
        assert!(dashboard.layout().await.drop_zone_highlighted);

        let receipt = dashboard
            .handle_files(vec![FileDescriptor::new("reading.csv", 1536)])
            .await
            .unwrap();
        assert_eq!(receipt.accepted.len(), 1);
        assert!(receipt.rejected.is_empty());
        assert!(!dashboard.layout().await.drop_zone_highlighted);
        assert_eq!(dashboard.view().await.uploads.in_progress.len(), 1);

        wait_for_uploads(&dashboard, 1).await;

        let files = dashboard.uploads().await;
        assert_eq!(files[0].name, "reading.csv");
        assert_eq!(files[0].file_type, "CSV");
        assert_eq!(files[0].size, "1.5 KB");
        assert!(dashboard.view().await.uploads.in_progress.is_empty());

        let notes = dashboard.notifications().await;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, UPLOAD_SUCCESS_MESSAGE);
        assert_eq!(notes[0].severity, Severity::Success);

        let events = drain(&mut rx);
        let percents: Vec<f64> = events
            .iter()
            .filter_map(|e| match e {
                DashboardEvent::UploadProgress { percent, .. } => Some(*percent),
                _ => None,
            })
            .collect();
        assert!(!percents.is_empty());
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(percents.last().copied(), Some(100.0));
        assert!(events
            .iter()
            .any(|e| matches!(e, DashboardEvent::UploadCompleted { upload_id, .. } if *upload_id == receipt.accepted[0].id)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_positive_upload_step_still_completes() {
        for step in [0.0, -3.0, f64::NAN] {
            let dashboard = Dashboard::new(DashboardConfig {
                upload_max_step: step,
                ..test_config()
            });
            assert_eq!(dashboard.config().upload_max_step, 30.0);

            dashboard
                .handle_files(vec![FileDescriptor::new("reading.csv", 1536)])
                .await
                .unwrap();
            wait_for_uploads(&dashboard, 1).await;

            assert!(dashboard.view().await.uploads.in_progress.is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_after_shutdown_leaves_no_progress() {
        let dashboard = Dashboard::new(test_config());
        dashboard.shutdown().await;

        let result = dashboard
            .handle_files(vec![FileDescriptor::new("reading.csv", 10)])
            .await;
        assert!(matches!(result, Err(DashboardError::ShutDown)));
        assert!(dashboard.view().await.uploads.in_progress.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_extension_rejected() {
        let dashboard = Dashboard::new(test_config());

        let receipt = dashboard
            .handle_files(vec![FileDescriptor::new("data.xlsx", 10)])
            .await
            .unwrap();
        assert!(receipt.accepted.is_empty());
        assert_eq!(receipt.rejected, vec!["data.xlsx"]);

        let notes = dashboard.notifications().await;
        assert_eq!(notes[0].message, INVALID_TYPE_MESSAGE);
        assert_eq!(notes[0].severity, Severity::Error);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(dashboard.uploads().await.is_empty());
        assert!(dashboard.notifications().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_batch_and_uppercase_extension() {
        let dashboard = Dashboard::new(test_config());

        let receipt = dashboard
            .handle_files(vec![
                FileDescriptor::new("capture.MAT", 2048),
                FileDescriptor::new("notes.txt", 5),
                FileDescriptor::new("reading.csv", 100),
            ])
            .await
            .unwrap();
        assert_eq!(receipt.accepted.len(), 2);
        assert_eq!(receipt.rejected, vec!["notes.txt"]);

        wait_for_uploads(&dashboard, 2).await;
        let mut names: Vec<String> = dashboard.uploads().await.into_iter().map(|f| f.name).collect();
        names.sort();
        assert_eq!(names, vec!["capture.MAT", "reading.csv"]);
    }

    #[tokio::test]
    async fn test_nameless_file_is_an_error() {
        let dashboard = Dashboard::new(test_config());
        let result = dashboard.handle_files(vec![FileDescriptor::new("  ", 1)]).await;
        assert!(matches!(result, Err(DashboardError::InvalidFile(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires() {
        let dashboard = Dashboard::new(test_config());
        let mut rx = dashboard.subscribe();

        let first = dashboard.notify("hello", Severity::Info).await.unwrap();
        let second = dashboard.notify("hello", Severity::Info).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(dashboard.notifications().await.len(), 2);

        tokio::time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(dashboard.notifications().await.len(), 2);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(dashboard.notifications().await.is_empty());
        assert_eq!(dashboard.task_count().await, 0);

        let expired = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, DashboardEvent::NotificationDismissed { expired: true, .. }))
            .count();
        assert_eq!(expired, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_timer() {
        let dashboard = Dashboard::new(test_config());
        let note = dashboard.notify("Saved", Severity::Success).await.unwrap();

        dashboard.dismiss(note.id).await.unwrap();
        assert!(dashboard.notifications().await.is_empty());
        assert_eq!(dashboard.task_count().await, 0);

        let again = dashboard.dismiss(note.id).await;
        assert!(matches!(again, Err(DashboardError::NotificationNotFound(id)) if id == note.id));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_updates_readings() {
        let dashboard = Dashboard::new(test_config());
        let mut rx = dashboard.subscribe();
        dashboard.start_ticker().await.unwrap();

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(dashboard.metrics().await, MetricSample::baseline());

        tokio::time::sleep(Duration::from_millis(6_200)).await;
        let ticks = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, DashboardEvent::MetricsUpdated { .. }))
            .count();
        assert_eq!(ticks, 3);

        let sample = dashboard.metrics().await;
        for reading in Reading::ALL {
            let (lo, hi) = reading.band().bounds();
            let value = sample.get(reading);
            assert!(value >= lo && value < hi, "{:?} = {}", reading, value);
        }

        assert!(dashboard.stop_ticker().await);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_everything() {
        let dashboard = Dashboard::new(test_config());
        dashboard.start().await.unwrap();
        dashboard
            .handle_files(vec![FileDescriptor::new("reading.csv", 10)])
            .await
            .unwrap();
        dashboard.notify("bye", Severity::Warning).await.unwrap();

        assert_eq!(dashboard.shutdown().await, 3);
        assert!(dashboard.is_shut_down());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(dashboard.uploads().await.is_empty());
        assert!(dashboard.view().await.uploads.in_progress.is_empty());
        assert_eq!(dashboard.notifications().await.len(), 1);

        let result = dashboard.notify("late", Severity::Info).await;
        assert!(matches!(result, Err(DashboardError::ShutDown)));
    }

    #[tokio::test]
    async fn test_filter_and_layout_events() {
        let dashboard = Dashboard::new(test_config());
        let mut rx = dashboard.subscribe();

        let (applied, visible) = dashboard
            .set_log_filter(&FilterSelection {
                event_type: "All Events".to_string(),
                severity: "Critical".to_string(),
            })
            .await;
        assert_eq!(applied.severity, "Critical");
        assert_eq!(visible, dashboard.view().await.logs.visible_count);

        dashboard.resize(600).await;
        let layout = dashboard.toggle_sidebar().await;
        assert!(layout.sidebar_open);
        let layout = dashboard.resize(1024).await;
        assert!(!layout.sidebar_open);
        assert!(!layout.mobile_menu_button);

        let events = drain(&mut rx);
        assert!(matches!(events[0], DashboardEvent::LogFilterChanged { .. }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, DashboardEvent::LayoutChanged { .. }))
                .count(),
            3
        );
    }
}
