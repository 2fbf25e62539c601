//! App Root Component
//!
//! Sidebar layout, active panel and global providers.

use leptos::*;

use crate::api;
use crate::components::{MenuButton, Sidebar, ToastStack};
use crate::pages::{Dashboard, Insights, Logs, Upload};
use crate::state::global::{provide_global_state, GlobalState};
use crate::state::websocket::init_websocket;

fn viewport_width() -> Option<u32> {
    web_sys::window()?
        .inner_width()
        .ok()?
        .as_f64()
        .map(|w| w as u32)
}

fn report_width(state: GlobalState) {
    let Some(width) = viewport_width() else {
        return;
    };
    spawn_local(async move {
        if let Err(e) = api::resize(width).await {
            state.show_error(&e);
        }
    });
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();

    let state = use_context::<GlobalState>().expect("GlobalState not found");
    state.refresh();
    report_width(state.clone());
    init_websocket(state.clone(), &api::get_api_base());

    let state_for_resize = state.clone();
    let _ = window_event_listener(ev::resize, move |_| {
        report_width(state_for_resize.clone());
    });

    let view_signal = state.view;
    let active = create_memo(move |_| view_signal.get().and_then(|v| v.active_panel));

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex">
            <Sidebar />

            <div class="flex-1 flex flex-col">
                <header class="h-16 flex items-center px-4 border-b border-gray-700 space-x-4">
                    <MenuButton />
                    <span class="text-gray-400 text-sm">"Power Quality Monitoring"</span>
                </header>

                <main class="flex-1 container mx-auto px-4 py-8 pb-24">
                    {move || match active.get().as_deref() {
                        Some("dashboard") => view! { <Dashboard /> }.into_view(),
                        Some("upload") => view! { <Upload /> }.into_view(),
                        Some("logs") => view! { <Logs /> }.into_view(),
                        Some("insights") => view! { <Insights /> }.into_view(),
                        // Unknown section ids leave every panel hidden
                        _ => view! {}.into_view(),
                    }}
                </main>

                <Footer />
            </div>

            <ToastStack />
        </div>
    }
}

/// Footer component showing connection status
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <div class="flex items-center space-x-2">
                    {move || {
                        if state.ws_connected.get() {
                            view! {
                                <span class="flex items-center space-x-1 text-green-400">
                                    <span class="w-2 h-2 bg-green-400 rounded-full pulse" />
                                    <span>"Live"</span>
                                </span>
                            }.into_view()
                        } else {
                            view! {
                                <span class="flex items-center space-x-1 text-red-400">
                                    <span class="w-2 h-2 bg-red-400 rounded-full" />
                                    <span>"Disconnected"</span>
                                </span>
                            }.into_view()
                        }
                    }}
                </div>

                <div class="text-gray-400">
                    {move || {
                        state.last_update.get()
                            .and_then(chrono::DateTime::from_timestamp_millis)
                            .map(|dt| format!("Last update: {}", dt.format("%H:%M:%S")))
                            .unwrap_or_else(|| "Waiting for data".to_string())
                    }}
                </div>

                {move || {
                    state.loading.get().then(|| view! {
                        <div class="flex items-center space-x-2 text-blue-400">
                            <div class="loading-spinner w-4 h-4" />
                            <span>"Loading..."</span>
                        </div>
                    })
                }}
            </div>
        </footer>
    }
}
