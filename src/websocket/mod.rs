//! WebSocket Real-Time Streaming
//!
//! Pushes dashboard changes to browser clients.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Manages all active connections and subscriptions
//! - **Handler**: Handles WebSocket upgrade and message processing
//! - **Messages**: Defines client and server message formats
//!
//! ## Topics
//!
//! Clients connect to `/api/v1/ws` and subscribe to:
//! - `dashboard.*` - Every dashboard change
//! - `dashboard.{channel}` - One of `view`, `uploads`, `notifications`,
//!   `metrics`, `logs`, `layout`
//! - `system` - Server lifecycle notices
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8090/api/v1/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', topics: ['dashboard.metrics']}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'update') console.log(msg.event.kind, msg.event);
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{is_valid_topic, ConnectionHub, HubConfig, HubError, DASHBOARD_CHANNELS};
pub use messages::{ClientMessage, ServerMessage, WsEvent};
