//! Chart Component
//!
//! Renders a server-built chart configuration on an HTML5 canvas. Line
//! charts may carry a second y axis on the right; bar charts take one color
//! per bar.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::state::global::{AxisOptions, ChartConfig, Dataset, GlobalState};

const BACKGROUND: &str = "#1e293b";
const DEFAULT_GRID: &str = "#334155";
const DEFAULT_TICK: &str = "#94a3b8";

const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 60.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// Canvas bound to one chart mount point (e.g. "powerChart")
#[component]
pub fn ChartCanvas(
    /// Mount id the server constructs the chart under
    mount: &'static str,
    #[prop(optional)]
    title: Option<&'static str>,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let canvas_ref = create_node_ref::<html::Canvas>();

    // Fetch the config the first time the mount appears in the view
    let state_for_fetch = state.clone();
    create_effect(move |loaded: Option<bool>| {
        if loaded == Some(true) {
            return true;
        }
        let constructed = state_for_fetch
            .view
            .get()
            .map(|v| v.charts.iter().any(|c| c == mount))
            .unwrap_or(false);
        if constructed {
            state_for_fetch.load_chart(mount.to_string());
        }
        constructed
    });

    // Redraw whenever the config changes
    let charts = state.charts;
    create_effect(move |_| {
        let config = charts.with(|c| c.get(mount).cloned());
        if let (Some(canvas), Some(config)) = (canvas_ref.get(), config) {
            draw_chart(&canvas, &config);
        }
    });

    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
            {title.map(|t| view! { <h3 class="text-lg font-semibold mb-3">{t}</h3> })}
            <canvas
                id=mount
                node_ref=canvas_ref
                width="800"
                height="320"
                class="w-full h-64 md:h-80 rounded-lg"
            />
        </div>
    }
}

/// Value range for an axis, padded unless pinned by options
fn axis_range(values: &[f64], axis: &AxisOptions) -> (f64, f64) {
    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let padding = if max > min { (max - min) * 0.1 } else { 1.0 };
    min -= padding;
    max += padding;

    if axis.begin_at_zero == Some(true) && min + padding >= 0.0 {
        min = 0.0;
    }
    if let Some(pinned) = axis.max {
        max = pinned;
    }
    if min >= max {
        min = max - 1.0;
    }
    (min, max)
}

/// Axis a dataset is drawn against
fn axis_key(dataset: &Dataset) -> &str {
    dataset.y_axis_id.as_deref().unwrap_or("y")
}

/// Horizontal center of slot `index` out of `count`
fn slot_x(index: usize, count: usize, chart_width: f64) -> f64 {
    let slot = chart_width / count.max(1) as f64;
    MARGIN_LEFT + slot * (index as f64 + 0.5)
}

fn context(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas.get_context("2d").ok()??.dyn_into::<CanvasRenderingContext2d>().ok()
}

/// Draw a chart configuration on canvas
fn draw_chart(canvas: &HtmlCanvasElement, config: &ChartConfig) {
    let Some(ctx) = context(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;
    let chart_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let chart_height = height - MARGIN_TOP - MARGIN_BOTTOM;

    ctx.set_fill_style(&BACKGROUND.into());
    ctx.fill_rect(0.0, 0.0, width, height);

    let default_axis = AxisOptions::default();
    let y_axis = |key: &str| config.options.scales.get(key).unwrap_or(&default_axis);

    // One range per y axis in use
    let mut ranges: Vec<(String, (f64, f64))> = Vec::new();
    for dataset in &config.data.datasets {
        let key = axis_key(dataset);
        if ranges.iter().any(|(k, _)| k == key) {
            continue;
        }
        let values: Vec<f64> = config
            .data
            .datasets
            .iter()
            .filter(|d| axis_key(d) == key)
            .flat_map(|d| d.data.iter().copied())
            .collect();
        ranges.push((key.to_string(), axis_range(&values, y_axis(key))));
    }

    let to_y = |value: f64, (min, max): (f64, f64)| {
        MARGIN_TOP + ((max - value) / (max - min)) * chart_height
    };

    // Grid and tick labels for each axis
    ctx.set_font("12px sans-serif");
    for (key, (min, max)) in &ranges {
        let axis = y_axis(key);
        if axis.display == Some(false) {
            continue;
        }
        let right = axis.position.as_deref() == Some("right");
        let draw_grid = axis.grid.draw_on_chart_area != Some(false) && !right;

        for i in 0..=5 {
            let y = MARGIN_TOP + (i as f64 / 5.0) * chart_height;
            if draw_grid {
                ctx.set_stroke_style(&axis.grid.color.as_deref().unwrap_or(DEFAULT_GRID).into());
                ctx.set_line_width(1.0);
                ctx.begin_path();
                ctx.move_to(MARGIN_LEFT, y);
                ctx.line_to(width - MARGIN_RIGHT, y);
                ctx.stroke();
            }

            let value = max - (i as f64 / 5.0) * (max - min);
            let x = if right { width - MARGIN_RIGHT + 6.0 } else { 6.0 };
            ctx.set_fill_style(&axis.ticks.color.as_deref().unwrap_or(DEFAULT_TICK).into());
            let _ = ctx.fill_text(&format!("{:.1}", value), x, y + 4.0);
        }
    }

    let count = config.data.labels.len();
    let range_of = |key: &str| {
        ranges
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, r)| *r)
            .unwrap_or((0.0, 1.0))
    };

    match config.kind.as_str() {
        "bar" => {
            let slot = chart_width / count.max(1) as f64;
            let bar_width = slot * 0.6;
            for dataset in &config.data.datasets {
                let range = range_of(axis_key(dataset));
                let base = to_y(range.0.max(0.0), range);
                for (i, value) in dataset.data.iter().enumerate() {
                    let top = to_y(*value, range);
                    let x = slot_x(i, count, chart_width) - bar_width / 2.0;
                    ctx.set_fill_style(&dataset.background_color.at(i).into());
                    ctx.fill_rect(x, top, bar_width, base - top);
                    ctx.set_stroke_style(&dataset.border_color.at(i).into());
                    ctx.set_line_width(dataset.border_width.unwrap_or(1.0));
                    ctx.stroke_rect(x, top, bar_width, base - top);
                }
            }
        }
        _ => {
            for dataset in &config.data.datasets {
                if dataset.data.is_empty() {
                    continue;
                }
                let range = range_of(axis_key(dataset));
                let points: Vec<(f64, f64)> = dataset
                    .data
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (slot_x(i, count.max(dataset.data.len()), chart_width), to_y(*v, range)))
                    .collect();

                if dataset.fill == Some(true) {
                    let floor = MARGIN_TOP + chart_height;
                    ctx.set_fill_style(&dataset.background_color.at(0).into());
                    ctx.begin_path();
                    ctx.move_to(points[0].0, floor);
                    for (x, y) in &points {
                        ctx.line_to(*x, *y);
                    }
                    ctx.line_to(points[points.len() - 1].0, floor);
                    ctx.close_path();
                    ctx.fill();
                }

                ctx.set_stroke_style(&dataset.border_color.at(0).into());
                ctx.set_line_width(dataset.border_width.unwrap_or(2.0));
                ctx.begin_path();
                for (i, (x, y)) in points.iter().enumerate() {
                    if i == 0 {
                        ctx.move_to(*x, *y);
                    } else {
                        ctx.line_to(*x, *y);
                    }
                }
                ctx.stroke();
            }
        }
    }

    // X-axis labels, thinned so they never overlap
    ctx.set_fill_style(&DEFAULT_TICK.into());
    ctx.set_font("12px sans-serif");
    let step = (count / 8).max(1);
    for (i, label) in config.data.labels.iter().enumerate().step_by(step) {
        let x = slot_x(i, count, chart_width);
        let _ = ctx.fill_text(label, x - 12.0, height - 12.0);
    }

    if config.options.plugins.legend.display {
        let mut x = MARGIN_LEFT;
        for dataset in &config.data.datasets {
            ctx.set_fill_style(&dataset.border_color.at(0).into());
            ctx.fill_rect(x, 12.0, 12.0, 12.0);
            ctx.set_fill_style(&DEFAULT_TICK.into());
            let _ = ctx.fill_text(&dataset.label, x + 18.0, 22.0);
            x += 30.0 + dataset.label.len() as f64 * 7.0;
        }
    }
}
