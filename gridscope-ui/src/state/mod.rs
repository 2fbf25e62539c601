//! State Management
//!
//! Cached dashboard view and WebSocket connection management.

pub mod global;
pub mod websocket;
