//! Dashboard Page
//!
//! Live readings and the active power trend.

use leptos::*;

use crate::components::{ChartCanvas, MetricCard};

/// Readings in display order
const READINGS: [&str; 7] = [
    "voltage",
    "current",
    "active_power",
    "reactive_power",
    "phasor_magnitude",
    "phasor_phase",
    "frequency",
];

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <p class="text-gray-400 mt-1">"Live power quality readings"</p>
            </div>

            <div class="grid grid-cols-2 md:grid-cols-4 gap-4">
                {READINGS.iter().map(|r| view! { <MetricCard reading=*r /> }).collect_view()}
            </div>

            <ChartCanvas mount="powerChart" title="Active Power" />
        </div>
    }
}
