//! API access for the dashboard UI

pub mod client;

pub use client::*;
