//! GridScope Dashboard
//!
//! Power quality monitoring dashboard built with Leptos (WASM).
//!
//! # Features
//!
//! - Live electrical readings refreshed by the server ticker
//! - Drag-and-drop upload simulator with progress bars
//! - Filterable event log
//! - Model insight charts
//!
//! # Architecture
//!
//! A client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! All dashboard state lives on the GridScope server; this crate renders the
//! server's view and mirrors changes pushed over the WebSocket.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    console_error_panic_hook::set_once();

    mount_to_body(|| view! { <app::App /> });
}
