//! Metric Card Component
//!
//! One live electrical reading, refreshed by the server ticker.

use leptos::*;

use crate::state::global::GlobalState;

/// Metric card component
#[component]
pub fn MetricCard(
    /// Reading key, e.g. "voltage" or "active_power"
    reading: &'static str,
) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let readout = create_memo(move |_| state.readout(reading));

    view! {
        <div class="bg-gray-800 rounded-lg p-4 border border-gray-700 hover:border-gray-600 transition">
            <div class="flex items-center justify-between">
                <span class="text-gray-400 text-sm">
                    {move || readout.get().map(|r| r.label).unwrap_or_default()}
                </span>
                <span class="text-gray-500 text-xs">
                    {move || readout.get().map(|r| r.unit).unwrap_or_default()}
                </span>
            </div>

            <div class="text-3xl font-bold mt-2" id=reading>
                {move || readout.get().map(|r| r.text).unwrap_or_else(|| "—".to_string())}
            </div>
        </div>
    }
}
