//! Notification events
//!
//! Defines the event types broadcast to WebSocket clients. Delivery is
//! best-effort fan-out: no acknowledgment, no ordering, no replay.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event types for notifications, serialized as `{type, data}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    StationCreated(StationEvent),
    StationUpdated(StationEvent),
    StationMaintenance(StationMaintenanceEvent),
    SessionCreated(SessionEvent),
    SessionEnded(SessionEndedEvent),
    PaymentCreated(PaymentEvent),
    PaymentCompleted(PaymentEvent),
    CustomerCreated(CustomerEvent),
    CustomerUpdated(CustomerEvent),
    CustomerDeleted(CustomerEvent),
    GameCreated(GameEvent),
    GameUpdated(GameEvent),
    GameDeleted(GameEvent),
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::StationCreated(_) => "STATION_CREATED",
            Event::StationUpdated(_) => "STATION_UPDATED",
            Event::StationMaintenance(_) => "STATION_MAINTENANCE",
            Event::SessionCreated(_) => "SESSION_CREATED",
            Event::SessionEnded(_) => "SESSION_ENDED",
            Event::PaymentCreated(_) => "PAYMENT_CREATED",
            Event::PaymentCompleted(_) => "PAYMENT_COMPLETED",
            Event::CustomerCreated(_) => "CUSTOMER_CREATED",
            Event::CustomerUpdated(_) => "CUSTOMER_UPDATED",
            Event::CustomerDeleted(_) => "CUSTOMER_DELETED",
            Event::GameCreated(_) => "GAME_CREATED",
            Event::GameUpdated(_) => "GAME_UPDATED",
            Event::GameDeleted(_) => "GAME_DELETED",
        }
    }

    /// Get the station ID if applicable
    pub fn station_id(&self) -> Option<i32> {
        match self {
            Event::StationCreated(e) | Event::StationUpdated(e) => Some(e.station_id),
            Event::StationMaintenance(e) => Some(e.station_id),
            Event::SessionCreated(e) => Some(e.station_id),
            Event::SessionEnded(e) => Some(e.station_id),
            Event::PaymentCreated(e) | Event::PaymentCompleted(e) => e.station_id,
            _ => None,
        }
    }
}

/// Station created/updated event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationEvent {
    pub station_id: i32,
    pub name: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Station moved into (or out of) maintenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationMaintenanceEvent {
    pub station_id: i32,
    pub name: String,
    pub reason: Option<String>,
    pub eta: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

/// Session started event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub session_id: i32,
    pub station_id: i32,
    pub customer_id: i32,
    pub session_type: String,
    pub timestamp: DateTime<Utc>,
}

/// Session ended event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEndedEvent {
    pub session_id: i32,
    pub station_id: i32,
    pub customer_id: i32,
    pub status: String,
    pub duration_minutes: i32,
    pub total_amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Payment created/completed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    pub payment_id: i32,
    pub session_id: Option<i32>,
    pub station_id: Option<i32>,
    pub amount: f64,
    pub method: String,
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Customer lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerEvent {
    pub customer_id: i32,
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

/// Game catalog lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameEvent {
    pub game_id: i32,
    pub title: String,
    pub timestamp: DateTime<Utc>,
}

/// Wrapper for sending events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: Event,
}

impl EventMessage {
    pub fn new(event: Event) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_as_type_and_data() {
        let event = Event::SessionCreated(SessionEvent {
            session_id: 1,
            station_id: 2,
            customer_id: 3,
            session_type: "HOURLY".into(),
            timestamp: Utc::now(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SESSION_CREATED");
        assert_eq!(json["data"]["station_id"], 2);
    }

    #[test]
    fn event_type_matches_wire_tag() {
        let event = Event::PaymentCompleted(PaymentEvent {
            payment_id: 1,
            session_id: None,
            station_id: None,
            amount: 250.0,
            method: "CASH".into(),
            status: "COMPLETED".into(),
            timestamp: Utc::now(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
    }
}
