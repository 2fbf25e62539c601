//! Event Logs Page

use leptos::*;

use crate::components::{LogFilters, LogTable};

#[component]
pub fn Logs() -> impl IntoView {
    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Event Logs"</h1>
            <div class="bg-gray-800 rounded-lg p-4 border border-gray-700">
                <LogFilters />
                <LogTable />
            </div>
        </div>
    }
}
