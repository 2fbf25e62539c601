//! WebSocket Message Types
//!
//! Defines all message types for WebSocket communication between
//! browser clients and the GridScope server.

use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardEvent;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics for real-time updates
    Subscribe {
        /// List of topics to subscribe to (e.g., "dashboard.metrics", "dashboard.*")
        topics: Vec<String>,
    },
    /// Unsubscribe from topics
    Unsubscribe {
        /// List of topics to unsubscribe from
        topics: Vec<String>,
    },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A dashboard state change
    Update {
        topic: String,
        event: DashboardEvent,
    },
    /// Server lifecycle notice
    System { message: String },
    /// Subscription confirmed
    Subscribed {
        /// Topics successfully subscribed to
        topics: Vec<String>,
    },
    /// Unsubscription confirmed
    Unsubscribed {
        /// Topics successfully unsubscribed from
        topics: Vec<String>,
    },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
}

/// Internal event for broadcasting through the hub
#[derive(Debug, Clone)]
pub struct WsEvent {
    /// Topic this event belongs to (e.g., "dashboard.uploads")
    pub topic: String,
    /// The message to send to subscribers
    pub message: ServerMessage,
}

impl WsEvent {
    /// Wrap a dashboard change under `dashboard.{channel}`
    pub fn dashboard(event: DashboardEvent) -> Self {
        let topic = format!("dashboard.{}", event.channel());
        Self {
            message: ServerMessage::Update {
                topic: topic.clone(),
                event,
            },
            topic,
        }
    }

    /// Create a system event
    pub fn system(message: &str) -> Self {
        Self {
            topic: "system".to_string(),
            message: ServerMessage::System {
                message: message.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::ChartMount;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["dashboard.metrics", "dashboard.uploads"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => {
                assert_eq!(topics.len(), 2);
                assert_eq!(topics[0], "dashboard.metrics");
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_serialize_update() {
        let event = WsEvent::dashboard(DashboardEvent::ChartInitialized {
            mount: ChartMount::Power,
        });
        assert_eq!(event.topic, "dashboard.view");

        let json = serde_json::to_value(&event.message).unwrap();
        assert_eq!(json["type"], "update");
        assert_eq!(json["topic"], "dashboard.view");
        assert_eq!(json["event"]["kind"], "chart_initialized");
        assert_eq!(json["event"]["mount"], "powerChart");
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"connection_id\":\"abc-123\""));
    }

    #[test]
    fn test_system_event() {
        let event = WsEvent::system("shutting down");
        assert_eq!(event.topic, "system");
        assert!(matches!(event.message, ServerMessage::System { .. }));
    }
}
