//! Event Log Components
//!
//! Two filter dropdowns over the fixed event table. Rows are hidden, not
//! removed, when the filter excludes them.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlSelectElement;

use crate::api;
use crate::state::global::{FilterSelection, GlobalState, LogsView};

/// Event type and severity dropdowns
#[component]
pub fn LogFilters() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let view_signal = state.view;
    let logs = create_memo(move |_| view_signal.get().map(|v| v.logs));

    let apply = move |selection: FilterSelection| {
        let state = state.clone();
        spawn_local(async move {
            if let Err(e) = api::set_log_filter(&selection).await {
                state.show_error(&e);
            }
        });
    };

    let apply_event = apply.clone();
    let on_event_change = move |ev: web_sys::Event| {
        if let (Some(value), Some(current)) = (select_value(&ev), logs.get_untracked()) {
            apply_event(FilterSelection {
                event_type: value,
                severity: current.selection.severity,
            });
        }
    };

    let on_severity_change = move |ev: web_sys::Event| {
        if let (Some(value), Some(current)) = (select_value(&ev), logs.get_untracked()) {
            apply(FilterSelection {
                event_type: current.selection.event_type,
                severity: value,
            });
        }
    };

    view! {
        <div class="flex space-x-4 mb-4">
            <select id="eventTypeFilter" class="bg-gray-700 rounded px-3 py-2" on:change=on_event_change>
                {move || options(logs.get(), |l| (&l.event_options, &l.selection.event_type))}
            </select>
            <select id="severityFilter" class="bg-gray-700 rounded px-3 py-2" on:change=on_severity_change>
                {move || options(logs.get(), |l| (&l.severity_options, &l.selection.severity))}
            </select>
        </div>
    }
}

fn select_value(ev: &web_sys::Event) -> Option<String> {
    ev.target()
        .and_then(|t| t.dyn_into::<HtmlSelectElement>().ok())
        .map(|s| s.value())
}

fn options(
    logs: Option<LogsView>,
    pick: impl Fn(&LogsView) -> (&Vec<String>, &String),
) -> impl IntoView {
    logs.map(|logs| {
        let (choices, selected) = pick(&logs);
        choices
            .iter()
            .map(|choice| {
                let is_selected = choice == selected;
                view! { <option value=choice.clone() selected=is_selected>{choice.clone()}</option> }
            })
            .collect_view()
    })
}

/// Event log table
#[component]
pub fn LogTable() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let view_signal = state.view;
    let logs = create_memo(move |_| view_signal.get().map(|v| v.logs));

    view! {
        <table id="logsTable" class="w-full text-sm">
            <thead class="text-gray-400 text-left">
                <tr>
                    <th class="py-2">"Timestamp"</th>
                    <th>"Event Type"</th>
                    <th>"Severity"</th>
                    <th>"Source"</th>
                    <th>"Message"</th>
                </tr>
            </thead>
            <tbody>
                {move || {
                    logs.get().map(|logs| logs.rows.into_iter().map(|row| view! {
                        <tr
                            class="border-t border-gray-700"
                            style=if row.visible { "" } else { "display: none" }
                        >
                            <td class="py-2">{row.timestamp}</td>
                            <td>{row.event_type}</td>
                            <td>{row.severity}</td>
                            <td>{row.source}</td>
                            <td>{row.message}</td>
                        </tr>
                    }).collect_view())
                }}
            </tbody>
        </table>
        <p class="text-gray-500 text-xs mt-2">
            {move || logs.get().map(|l| format!("{} events shown", l.visible_count)).unwrap_or_default()}
        </p>
    }
}
