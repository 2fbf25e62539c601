//! Toast Notification Component
//!
//! Stack of server notifications in the top-right corner plus the local
//! error toast for failed requests.

use leptos::*;

use crate::api;
use crate::state::global::{GlobalState, Notification};

/// Toast notification container
#[component]
pub fn ToastStack() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let view_signal = state.view;

    let notifications = create_memo(move |_| {
        view_signal
            .get()
            .map(|v| v.notifications)
            .unwrap_or_default()
    });

    view! {
        <div class="fixed top-4 right-4 z-50 space-y-2 w-80">
            <For
                each=move || notifications.get()
                key=|n| n.id
                children=move |n| view! { <ToastMessage notification=n /> }
            />

            // Request failures never reach the server
            {move || {
                state.error.get().map(|msg| view! {
                    <div class="flex items-center space-x-3 bg-red-600 text-white px-4 py-3 rounded-lg shadow-lg">
                        <span class="text-lg">"✕"</span>
                        <span class="text-sm font-medium">{msg}</span>
                    </div>
                })
            }}
        </div>
    }
}

fn severity_style(severity: &str) -> (&'static str, &'static str) {
    match severity {
        "success" => ("✓", "bg-green-600"),
        "error" => ("✕", "bg-red-600"),
        "warning" => ("⚠", "bg-yellow-600"),
        _ => ("ℹ", "bg-blue-600"),
    }
}

#[component]
fn ToastMessage(notification: Notification) -> impl IntoView {
    let (icon, bg_class) = severity_style(&notification.severity);
    let id = notification.id;

    let on_close = move |_| {
        spawn_local(async move {
            if let Err(e) = api::dismiss_notification(id).await {
                web_sys::console::error_1(&format!("Failed to dismiss: {}", e).into());
            }
        });
    };

    view! {
        <div class=format!(
            "notification flex items-center space-x-3 {} text-white px-4 py-3 rounded-lg shadow-lg \
             transform transition-all duration-300 ease-out animate-slide-in",
            bg_class
        )>
            <span class="text-lg">{icon}</span>
            <span class="text-sm font-medium flex-1">{notification.message}</span>
            <button class="notification-close text-white/80 hover:text-white" on:click=on_close>
                "×"
            </button>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_style() {
        assert_eq!(severity_style("error").1, "bg-red-600");
        assert_eq!(severity_style("info").1, "bg-blue-600");
        assert_eq!(severity_style("anything").0, "ℹ");
    }
}
