//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::config::ApiConfig;
use crate::dashboard::Dashboard;
use crate::websocket::{ConnectionHub, HubConfig, WsEvent};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The running dashboard engine
    pub dashboard: Dashboard,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for real-time streaming
    pub ws_hub: Arc<ConnectionHub>,
}

impl AppState {
    pub fn new(dashboard: Dashboard, config: ApiConfig) -> Self {
        let hub_config = HubConfig {
            max_connections: config.max_ws_connections,
        };
        Self {
            dashboard,
            config: Arc::new(config),
            start_time: Instant::now(),
            ws_hub: Arc::new(ConnectionHub::new(hub_config)),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }

    /// Relay every dashboard change to WebSocket subscribers
    pub fn forward_events(&self) -> JoinHandle<()> {
        let mut events = self.dashboard.subscribe();
        let hub = Arc::clone(&self.ws_hub);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        hub.broadcast(&WsEvent::dashboard(event)).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "WebSocket relay fell behind, events dropped");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::websocket::ServerMessage;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_forward_events_reaches_subscribers() {
        let state = AppState::new(Dashboard::new(DashboardConfig::default()), ApiConfig::default());
        let relay = state.forward_events();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = state.ws_hub.register(tx).await.unwrap();
        state
            .ws_hub
            .subscribe(&id, vec!["dashboard.view".to_string()])
            .await
            .unwrap();

        state.dashboard.show_section("logs").await;

        let msg = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match msg {
            ServerMessage::Update { topic, .. } => assert_eq!(topic, "dashboard.view"),
            other => panic!("Expected Update, got {:?}", other),
        }

        relay.abort();
    }
}
