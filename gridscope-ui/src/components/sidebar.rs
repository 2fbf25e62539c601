//! Sidebar Component
//!
//! Panel navigation. On narrow screens the sidebar slides in from the
//! header menu button.

use leptos::*;

use crate::api;
use crate::state::global::{GlobalState, PanelView};

/// Navigation sidebar component
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let view_signal = state.view;

    let panels = create_memo(move |_| view_signal.get().map(|v| v.panels).unwrap_or_default());
    let open = create_memo(move |_| {
        view_signal
            .get()
            .map(|v| v.layout.sidebar_open)
            .unwrap_or(false)
    });

    view! {
        <aside class=move || {
            let base = "sidebar w-64 bg-gray-800 border-r border-gray-700 min-h-screen";
            if open.get() {
                format!("{} active", base)
            } else {
                base.to_string()
            }
        }>
            <div class="flex items-center space-x-3 px-6 h-16 border-b border-gray-700">
                <span class="text-2xl">"⚡"</span>
                <span class="text-xl font-bold text-white">"GridScope"</span>
            </div>

            <nav class="p-4 space-y-1">
                <For
                    each=move || panels.get()
                    key=|p| (p.id.clone(), p.nav_highlighted)
                    children=move |p| view! { <NavLink panel=p /> }
                />
            </nav>
        </aside>
    }
}

/// Individual navigation link
#[component]
fn NavLink(panel: PanelView) -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let id = panel.id.clone();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        let id = id.clone();
        let state = state.clone();
        spawn_local(async move {
            match api::show_section(&id).await {
                Ok(()) => state.refresh(),
                Err(e) => state.show_error(&e),
            }
        });
    };

    let class = if panel.nav_highlighted {
        "nav-link active block px-4 py-2 rounded-lg bg-gray-700 text-white"
    } else {
        "nav-link block px-4 py-2 rounded-lg text-gray-300 hover:text-white hover:bg-gray-700 transition-colors"
    };

    view! {
        <a href=panel.href class=class on:click=on_click>
            {panel.title}
        </a>
    }
}

/// Header button that toggles the sidebar on narrow screens
#[component]
pub fn MenuButton() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let view_signal = state.view;
    let shown = create_memo(move |_| {
        view_signal
            .get()
            .map(|v| v.layout.mobile_menu_button)
            .unwrap_or(false)
    });

    let on_click = move |_| {
        let state = state.clone();
        spawn_local(async move {
            if let Err(e) = api::toggle_sidebar().await {
                state.show_error(&e);
            }
        });
    };

    view! {
        <Show when=move || shown.get()>
            <button
                class="mobile-menu-btn px-3 py-2 rounded-lg bg-gray-700 text-white"
                on:click=on_click.clone()
            >
                "☰"
            </button>
        </Show>
    }
}
