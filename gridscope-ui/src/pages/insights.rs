//! Model Insights Page
//!
//! Training history and feature importance of the event classifier.

use leptos::*;

use crate::components::ChartCanvas;

#[component]
pub fn Insights() -> impl IntoView {
    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Model Insights"</h1>
            <div class="grid md:grid-cols-2 gap-6">
                <ChartCanvas mount="trainingChart" title="Training History" />
                <ChartCanvas mount="featureChart" title="Feature Importance" />
            </div>
        </div>
    }
}
