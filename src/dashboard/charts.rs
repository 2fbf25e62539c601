//! Chart Bootstrapper
//!
//! Builds the declarative configurations for the three dashboard charts and
//! keeps track of which mount points already carry a chart. Rendering is done
//! by whoever consumes the serialized [`ChartConfig`] (the UI canvas renderer);
//! the engine never looks past the configuration.
//!
//! Configurations serialize to the same shape Chart.js accepts:
//!
//! ```json
//! { "type": "line", "data": { "labels": [...], "datasets": [...] }, "options": {...} }
//! ```

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::error::DashboardError;

const GRID_COLOR: &str = "#334155";
const TICK_COLOR: &str = "#94a3b8";
const LEGEND_COLOR: &str = "#ffffff";

/// Number of samples in the synthetic power series
pub const POWER_SERIES_LEN: usize = 50;

pub const TRAINING_ACCURACY: [f64; 10] = [0.65, 0.72, 0.78, 0.84, 0.89, 0.93, 0.95, 0.97, 0.98, 0.982];
pub const TRAINING_LOSS: [f64; 10] = [0.8, 0.6, 0.45, 0.32, 0.24, 0.18, 0.13, 0.09, 0.06, 0.04];

pub const FEATURE_NAMES: [&str; 5] = ["Voltage RMS", "Current THD", "Power Factor", "Frequency", "Harmonics"];
pub const FEATURE_IMPORTANCE: [f64; 5] = [0.85, 0.72, 0.68, 0.45, 0.32];

/// Mount points a chart can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChartMount {
    #[serde(rename = "powerChart")]
    Power,
    #[serde(rename = "trainingChart")]
    Training,
    #[serde(rename = "featureChart")]
    Feature,
}

impl ChartMount {
    pub const ALL: [ChartMount; 3] = [ChartMount::Power, ChartMount::Training, ChartMount::Feature];

    /// Element id of the mount point
    pub fn element_id(&self) -> &'static str {
        match self {
            ChartMount::Power => "powerChart",
            ChartMount::Training => "trainingChart",
            ChartMount::Feature => "featureChart",
        }
    }

    /// Build the configuration for this mount point
    pub fn build_config<R: Rng + ?Sized>(&self, rng: &mut R) -> ChartConfig {
        match self {
            ChartMount::Power => power_chart(rng),
            ChartMount::Training => training_chart(),
            ChartMount::Feature => feature_chart(),
        }
    }
}

impl fmt::Display for ChartMount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

impl FromStr for ChartMount {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartMount::ALL
            .into_iter()
            .find(|m| m.element_id() == s)
            .ok_or_else(|| DashboardError::UnknownChartMount(s.to_string()))
    }
}

// ============================================
// Declarative chart configuration
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

/// Full chart configuration handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// A color applied to a whole dataset, or one color per data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Paint {
    Solid(String),
    PerPoint(Vec<String>),
}

impl Paint {
    /// Color for the point at `index`
    pub fn at(&self, index: usize) -> &str {
        match self {
            Paint::Solid(c) => c,
            Paint::PerPoint(colors) if colors.is_empty() => LEGEND_COLOR,
            Paint::PerPoint(colors) => &colors[index % colors.len()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Paint,
    pub background_color: Paint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(default, rename = "yAxisID", skip_serializing_if = "Option::is_none")]
    pub y_axis_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub scales: BTreeMap<String, AxisOptions>,
    pub plugins: Plugins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub axis_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<AxisPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default)]
    pub grid: GridOptions,
    #[serde(default)]
    pub ticks: TickOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_on_chart_area: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub display: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<TickOptions>,
}

impl Legend {
    fn visible() -> Self {
        Self {
            display: true,
            labels: Some(TickOptions {
                color: Some(LEGEND_COLOR.to_string()),
            }),
        }
    }

    fn hidden() -> Self {
        Self {
            display: false,
            labels: None,
        }
    }
}

/// Axis with the dashboard's dark grid and muted tick labels
fn themed_axis() -> AxisOptions {
    AxisOptions {
        grid: GridOptions {
            color: Some(GRID_COLOR.to_string()),
            draw_on_chart_area: None,
        },
        ticks: TickOptions {
            color: Some(TICK_COLOR.to_string()),
        },
        ..Default::default()
    }
}

fn options(scales: BTreeMap<String, AxisOptions>, legend: Legend) -> ChartOptions {
    ChartOptions {
        responsive: true,
        maintain_aspect_ratio: false,
        scales,
        plugins: Plugins { legend },
    }
}

fn solid(color: &str) -> Paint {
    Paint::Solid(color.to_string())
}

/// Active power time series: a slow sine wave with uniform noise on top
pub fn power_chart<R: Rng + ?Sized>(rng: &mut R) -> ChartConfig {
    let labels = (0..POWER_SERIES_LEN).map(|i| i.to_string()).collect();
    let data = (0..POWER_SERIES_LEN)
        .map(|i| 3.0 + (i as f64 * 0.1).sin() * 0.5 + rng.gen::<f64>() * 0.2)
        .collect();

    let mut y = themed_axis();
    y.begin_at_zero = Some(false);

    let scales = BTreeMap::from([("x".to_string(), themed_axis()), ("y".to_string(), y)]);

    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                label: "Active Power (kW)".to_string(),
                data,
                border_color: solid("#10b981"),
                background_color: solid("rgba(16, 185, 129, 0.1)"),
                border_width: Some(2.0),
                fill: Some(true),
                tension: Some(0.4),
                y_axis_id: None,
            }],
        },
        options: options(scales, Legend::visible()),
    }
}

/// Model training curve with accuracy on the left axis and loss on the right
pub fn training_chart() -> ChartConfig {
    let labels = (1..=TRAINING_ACCURACY.len()).map(|e| e.to_string()).collect();

    let mut y = themed_axis();
    y.axis_type = Some("linear".to_string());
    y.display = Some(true);
    y.position = Some(AxisPosition::Left);

    let y1 = AxisOptions {
        axis_type: Some("linear".to_string()),
        display: Some(true),
        position: Some(AxisPosition::Right),
        grid: GridOptions {
            color: None,
            draw_on_chart_area: Some(false),
        },
        ticks: TickOptions {
            color: Some(TICK_COLOR.to_string()),
        },
        ..Default::default()
    };

    let scales = BTreeMap::from([
        ("x".to_string(), themed_axis()),
        ("y".to_string(), y),
        ("y1".to_string(), y1),
    ]);

    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels,
            datasets: vec![
                Dataset {
                    label: "Accuracy".to_string(),
                    data: TRAINING_ACCURACY.to_vec(),
                    border_color: solid("#10b981"),
                    background_color: solid("rgba(16, 185, 129, 0.1)"),
                    border_width: None,
                    fill: None,
                    tension: None,
                    y_axis_id: Some("y".to_string()),
                },
                Dataset {
                    label: "Loss".to_string(),
                    data: TRAINING_LOSS.to_vec(),
                    border_color: solid("#ef4444"),
                    background_color: solid("rgba(239, 68, 68, 0.1)"),
                    border_width: None,
                    fill: None,
                    tension: None,
                    y_axis_id: Some("y1".to_string()),
                },
            ],
        },
        options: options(scales, Legend::visible()),
    }
}

/// Feature importance bars, one color per feature
pub fn feature_chart() -> ChartConfig {
    let mut y = themed_axis();
    y.begin_at_zero = Some(true);
    y.max = Some(1.0);

    let scales = BTreeMap::from([("x".to_string(), themed_axis()), ("y".to_string(), y)]);

    let fills = [
        "rgba(59, 130, 246, 0.8)",
        "rgba(16, 185, 129, 0.8)",
        "rgba(245, 158, 11, 0.8)",
        "rgba(239, 68, 68, 0.8)",
        "rgba(139, 92, 246, 0.8)",
    ];
    let borders = ["#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6"];

    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            datasets: vec![Dataset {
                label: "Importance".to_string(),
                data: FEATURE_IMPORTANCE.to_vec(),
                border_color: Paint::PerPoint(borders.iter().map(|s| s.to_string()).collect()),
                background_color: Paint::PerPoint(fills.iter().map(|s| s.to_string()).collect()),
                border_width: Some(1.0),
                fill: None,
                tension: None,
                y_axis_id: None,
            }],
        },
        options: options(scales, Legend::hidden()),
    }
}

// ============================================
// Registry of constructed charts
// ============================================

/// A chart attached to its mount point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartInstance {
    pub mount: ChartMount,
    pub config: ChartConfig,
    pub created_at: DateTime<Utc>,
}

/// Charts constructed so far, at most one per mount point
#[derive(Debug, Clone, Default)]
pub struct ChartRegistry {
    instances: BTreeMap<ChartMount, ChartInstance>,
    constructions: usize,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct the chart for `mount` unless one is already attached.
    ///
    /// Returns true when a new chart was constructed.
    pub fn ensure<R: Rng + ?Sized>(&mut self, mount: ChartMount, rng: &mut R) -> bool {
        if self.instances.contains_key(&mount) {
            return false;
        }

        let instance = ChartInstance {
            mount,
            config: mount.build_config(rng),
            created_at: Utc::now(),
        };
        self.instances.insert(mount, instance);
        self.constructions += 1;
        true
    }

    pub fn get(&self, mount: ChartMount) -> Option<&ChartInstance> {
        self.instances.get(&mount)
    }

    pub fn is_initialized(&self, mount: ChartMount) -> bool {
        self.instances.contains_key(&mount)
    }

    pub fn instances(&self) -> impl Iterator<Item = &ChartInstance> {
        self.instances.values()
    }

    pub fn mounts(&self) -> Vec<ChartMount> {
        self.instances.keys().copied().collect()
    }

    /// Total number of constructions since startup
    pub fn constructions(&self) -> usize {
        self.constructions
    }
}
