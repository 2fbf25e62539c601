//! WebSocket Client
//!
//! Real-time connection to the GridScope API. Every `dashboard.*` change is
//! folded into the cached view as it arrives.

use leptos::*;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::global::{DashboardEvent, GlobalState};

/// Topics every dashboard client follows
const DEFAULT_TOPICS: [&str; 2] = ["dashboard.*", "system"];

const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// WebSocket message types from server
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    Connected {
        connection_id: String,
    },
    Update {
        topic: String,
        event: DashboardEvent,
    },
    System {
        message: String,
    },
    Subscribed {
        topics: Vec<String>,
    },
    Unsubscribed {
        topics: Vec<String>,
    },
    Pong,
    Error {
        message: String,
    },
}

/// WebSocket client message types
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { topics: Vec<String> },
    Unsubscribe { topics: Vec<String> },
    Ping,
}

/// WebSocket client for real-time updates
#[derive(Clone)]
pub struct WebSocketClient {
    ws: Rc<RefCell<Option<WebSocket>>>,
    url: String,
    reconnect_attempts: Rc<RefCell<u32>>,
}

impl WebSocketClient {
    pub fn new(url: &str) -> Self {
        Self {
            ws: Rc::new(RefCell::new(None)),
            url: url.to_string(),
            reconnect_attempts: Rc::new(RefCell::new(0)),
        }
    }

    /// Connect to the WebSocket server
    pub fn connect(&self, state: GlobalState) {
        match WebSocket::new(&self.url) {
            Ok(ws) => {
                self.setup_handlers(&ws, state);
                *self.ws.borrow_mut() = Some(ws);
            }
            Err(e) => {
                web_sys::console::error_1(&format!("WebSocket connection failed: {:?}", e).into());
                self.schedule_reconnect(state);
            }
        }
    }

    fn setup_handlers(&self, ws: &WebSocket, state: GlobalState) {
        // Subscribe once the socket is open; sending earlier fails
        let state_clone = state.clone();
        let client = self.clone();
        let on_open = Closure::wrap(Box::new(move |_: JsValue| {
            web_sys::console::log_1(&"WebSocket connected".into());
            state_clone.ws_connected.set(true);
            *client.reconnect_attempts.borrow_mut() = 0;

            let topics = DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect();
            if let Err(e) = client.subscribe(topics) {
                web_sys::console::error_1(&format!("Subscribe failed: {}", e).into());
            }
            // Catch up on anything missed while disconnected
            state_clone.refresh();
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
        on_open.forget();

        let state_clone = state.clone();
        let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
            if let Ok(text) = event.data().dyn_into::<js_sys::JsString>() {
                let text_str: String = text.into();
                handle_message(&text_str, &state_clone);
            }
        }) as Box<dyn FnMut(MessageEvent)>);
        ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
        on_message.forget();

        let state_clone = state;
        let client = self.clone();
        let on_close = Closure::wrap(Box::new(move |event: CloseEvent| {
            web_sys::console::log_1(
                &format!("WebSocket closed: code={}, reason={}", event.code(), event.reason()).into(),
            );
            state_clone.ws_connected.set(false);
            client.schedule_reconnect(state_clone.clone());
        }) as Box<dyn FnMut(CloseEvent)>);
        ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));
        on_close.forget();

        let on_error = Closure::wrap(Box::new(move |e: JsValue| {
            web_sys::console::error_1(&format!("WebSocket error: {:?}", e).into());
        }) as Box<dyn FnMut(JsValue)>);
        ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
        on_error.forget();
    }

    /// Schedule a reconnect attempt with exponential backoff
    fn schedule_reconnect(&self, state: GlobalState) {
        let attempts = *self.reconnect_attempts.borrow();
        if attempts >= MAX_RECONNECT_ATTEMPTS {
            web_sys::console::error_1(&"Max reconnect attempts reached".into());
            return;
        }

        let delay = (2_u32.pow(attempts) * 1000).min(30000);
        *self.reconnect_attempts.borrow_mut() = attempts + 1;

        let client = self.clone();
        gloo_timers::callback::Timeout::new(delay, move || {
            web_sys::console::log_1(&format!("Attempting reconnect (attempt {})", attempts + 1).into());
            client.connect(state);
        })
        .forget();
    }

    /// Send a message to the server
    pub fn send(&self, message: &ClientMessage) -> Result<(), String> {
        let ws_guard = self.ws.borrow();
        let ws = ws_guard.as_ref().ok_or("WebSocket not connected")?;

        let json = serde_json::to_string(message).map_err(|e| e.to_string())?;
        ws.send_with_str(&json).map_err(|e| format!("{:?}", e))
    }

    pub fn subscribe(&self, topics: Vec<String>) -> Result<(), String> {
        self.send(&ClientMessage::Subscribe { topics })
    }
}

/// Handle incoming WebSocket message
fn handle_message(text: &str, state: &GlobalState) {
    match serde_json::from_str::<WsMessage>(text) {
        Ok(msg) => match msg {
            WsMessage::Connected { connection_id } => {
                web_sys::console::log_1(&format!("Connected with ID: {}", connection_id).into());
            }
            WsMessage::Update { event, .. } => {
                state.apply(event);
            }
            WsMessage::System { message } => {
                web_sys::console::log_1(&format!("Server: {}", message).into());
            }
            WsMessage::Subscribed { topics } => {
                web_sys::console::log_1(&format!("Subscribed to: {:?}", topics).into());
            }
            WsMessage::Unsubscribed { .. } | WsMessage::Pong => {}
            WsMessage::Error { message } => {
                web_sys::console::error_1(&format!("Server error: {}", message).into());
                state.show_error(&message);
            }
        },
        Err(e) => {
            web_sys::console::error_1(&format!("Failed to parse WebSocket message: {}", e).into());
        }
    }
}

/// Initialize WebSocket connection (call from app root)
pub fn init_websocket(state: GlobalState, api_base: &str) {
    // api_base already ends in /api/v1
    let ws_url = api_base.replace("http://", "ws://").replace("https://", "wss://");
    let ws_url = format!("{}/ws", ws_url);

    WebSocketClient::new(&ws_url).connect(state);
}
