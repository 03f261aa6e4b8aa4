//! WebSocket handler for UI notification clients
//!
//! Streams the event-bus fan-out to connected dashboards. Best-effort:
//! a slow client skips lagged events, a closed socket just drops the
//! subscription.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, error, info, warn};

use crate::notifications::{EventMessage, SharedEventBus};

/// Query parameters for filtering events
#[derive(Debug, Deserialize)]
pub struct EventFilter {
    /// Filter by station ID (optional)
    pub station_id: Option<i32>,
    /// Filter by event types (comma-separated, optional)
    pub event_types: Option<String>,
}

impl EventFilter {
    /// Check if event matches the filter
    pub fn matches(&self, event: &EventMessage) -> bool {
        if let Some(station_id) = self.station_id {
            if event.event.station_id() != Some(station_id) {
                return false;
            }
        }

        if let Some(ref types) = self.event_types {
            let allowed: Vec<&str> = types.split(',').map(|s| s.trim()).collect();
            if !allowed.contains(&event.event.event_type()) {
                return false;
            }
        }

        true
    }
}

/// State for notification WebSocket handler
#[derive(Clone)]
pub struct NotificationState {
    pub event_bus: SharedEventBus,
}

/// WebSocket upgrade handler for notifications
pub async fn ws_notifications_handler(
    ws: WebSocketUpgrade,
    State(state): State<NotificationState>,
    Query(filter): Query<EventFilter>,
) -> impl IntoResponse {
    info!(
        "New notification WebSocket connection: station={:?}, event_types={:?}",
        filter.station_id, filter.event_types
    );

    ws.on_upgrade(move |socket| handle_notification_socket(socket, state, filter))
}

/// Handle a WebSocket connection for notifications
async fn handle_notification_socket(
    socket: WebSocket,
    state: NotificationState,
    filter: EventFilter,
) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscriber = state.event_bus.subscribe();

    // Send welcome message
    let welcome = serde_json::json!({
        "type": "connected",
        "message": "Connected to notification stream",
        "filter": {
            "station_id": filter.station_id,
            "event_types": filter.event_types
        }
    });

    if let Err(e) = sender.send(Message::Text(welcome.to_string().into())).await {
        error!("Failed to send welcome message: {}", e);
        return;
    }

    info!("Notification WebSocket client connected");

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Received text message: {}", text);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            error!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {
                        debug!("Received pong");
                    }
                    Some(Ok(Message::Close(_))) => {
                        info!("Client sent close");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    None => {
                        info!("WebSocket stream ended");
                        break;
                    }
                    _ => {}
                }
            }

            event = subscriber.recv() => {
                match event {
                    Some(event_msg) => {
                        if !filter.matches(&event_msg) {
                            continue;
                        }

                        match serde_json::to_string(&event_msg) {
                            Ok(json) => {
                                if let Err(e) = sender.send(Message::Text(json.into())).await {
                                    error!("Failed to send event: {}", e);
                                    break;
                                }
                                debug!("Event sent to client: {}", event_msg.event.event_type());
                            }
                            Err(e) => {
                                error!("Failed to serialize event: {}", e);
                            }
                        }
                    }
                    None => {
                        warn!("Event bus closed");
                        break;
                    }
                }
            }
        }
    }

    info!("Notification WebSocket client disconnected");
}

/// Create notification state
pub fn create_notification_state(event_bus: SharedEventBus) -> NotificationState {
    NotificationState { event_bus }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::{Event, SessionEvent};
    use chrono::Utc;

    fn session_event(station_id: i32) -> EventMessage {
        EventMessage::new(Event::SessionCreated(SessionEvent {
            session_id: 1,
            station_id,
            customer_id: 2,
            session_type: "HOURLY".into(),
            timestamp: Utc::now(),
        }))
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = EventFilter {
            station_id: None,
            event_types: None,
        };
        assert!(filter.matches(&session_event(3)));
    }

    #[test]
    fn station_filter_matches_only_that_station() {
        let filter = EventFilter {
            station_id: Some(3),
            event_types: None,
        };
        assert!(filter.matches(&session_event(3)));
        assert!(!filter.matches(&session_event(4)));
    }

    #[test]
    fn event_type_filter_is_a_comma_list() {
        let filter = EventFilter {
            station_id: None,
            event_types: Some("SESSION_CREATED, SESSION_ENDED".into()),
        };
        assert!(filter.matches(&session_event(1)));

        let filter = EventFilter {
            station_id: None,
            event_types: Some("PAYMENT_COMPLETED".into()),
        };
        assert!(!filter.matches(&session_event(1)));
    }
}
