//! Upload Components
//!
//! Drop zone, file picker, progress bars and the uploaded-files table.
//! Only file names and sizes are sent to the server.

use leptos::*;
use wasm_bindgen::JsCast;
use web_sys::{FileList, HtmlInputElement};

use crate::api::{self, FileDescriptor};
use crate::state::global::GlobalState;

fn descriptors(files: &FileList) -> Vec<FileDescriptor> {
    (0..files.length())
        .filter_map(|i| files.get(i))
        .map(|file| FileDescriptor {
            name: file.name(),
            size: file.size() as u64,
            mime_type: file.type_(),
        })
        .collect()
}

fn submit(state: GlobalState, files: Vec<FileDescriptor>) {
    if files.is_empty() {
        return;
    }
    spawn_local(async move {
        if let Err(e) = api::submit_files(&files).await {
            state.show_error(&e);
        }
    });
}

/// Drop zone with a hidden file input behind it
#[component]
pub fn DropZone() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let input_ref = create_node_ref::<html::Input>();
    let view_signal = state.view;

    let highlighted = create_memo(move |_| {
        view_signal
            .get()
            .map(|v| v.layout.drop_zone_highlighted)
            .unwrap_or(false)
    });

    let state_for_over = state.clone();
    let on_drag_over = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        if highlighted.get_untracked() {
            return;
        }
        let state = state_for_over.clone();
        spawn_local(async move {
            if let Err(e) = api::drag_over().await {
                state.show_error(&e);
            }
        });
    };

    let state_for_drop = state.clone();
    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        let files = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .map(|list| descriptors(&list))
            .unwrap_or_default();
        submit(state_for_drop.clone(), files);
    };

    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let state_for_change = state;
    let on_change = move |ev: web_sys::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        let files = input.files().map(|list| descriptors(&list)).unwrap_or_default();
        submit(state_for_change.clone(), files);
        // Picking the same file twice must still fire change
        input.set_value("");
    };

    view! {
        <div
            id="dropZone"
            class=move || {
                let base = "drop-zone border-2 border-dashed rounded-lg p-10 text-center cursor-pointer transition-colors";
                if highlighted.get() {
                    format!("{} dragover border-blue-400 bg-gray-700", base)
                } else {
                    format!("{} border-gray-600 hover:border-gray-500", base)
                }
            }
            on:dragover=on_drag_over
            on:drop=on_drop
            on:click=on_click
        >
            <div class="text-4xl mb-2">"📁"</div>
            <p class="text-gray-300">"Drag and drop CSV or MAT files here, or click to browse"</p>
            <input
                id="fileInput"
                node_ref=input_ref
                type="file"
                multiple=true
                accept=".csv,.mat"
                class="hidden"
                on:change=on_change
            />
        </div>
    }
}

/// One progress bar per file in flight
#[component]
pub fn UploadProgressList() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let view_signal = state.view;
    let in_progress = create_memo(move |_| {
        view_signal
            .get()
            .map(|v| v.uploads.in_progress)
            .unwrap_or_default()
    });

    view! {
        <div id="uploadProgress" class="space-y-3">
            {move || {
                in_progress.get().into_iter().map(|p| view! {
                    <div class="upload-progress-item">
                        <div class="text-sm text-gray-300 mb-1">{p.label}</div>
                        <div class="w-full bg-gray-700 rounded h-2">
                            <div
                                class="progress-fill bg-blue-500 h-2 rounded transition-all"
                                style=format!("width: {}%", p.percent)
                            />
                        </div>
                    </div>
                }).collect_view()
            }}
        </div>
    }
}

/// Uploaded-files table
#[component]
pub fn UploadedFilesTable() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let view_signal = state.view;
    let files = create_memo(move |_| {
        view_signal
            .get()
            .map(|v| v.uploads.files)
            .unwrap_or_default()
    });

    view! {
        <table id="uploadedFilesTable" class="w-full text-sm">
            <thead class="text-gray-400 text-left">
                <tr>
                    <th class="py-2">"File Name"</th>
                    <th>"Type"</th>
                    <th>"Size"</th>
                    <th>"Uploaded"</th>
                    <th>"Status"</th>
                </tr>
            </thead>
            <tbody>
                {move || {
                    files.get().into_iter().map(|f| view! {
                        <tr class="border-t border-gray-700">
                            <td class="py-2">{f.name}</td>
                            <td>{f.file_type}</td>
                            <td>{f.size}</td>
                            <td>{f.uploaded_at}</td>
                            <td><span class="status-badge status-success">{f.status}</span></td>
                        </tr>
                    }).collect_view()
                }}
            </tbody>
        </table>
    }
}
