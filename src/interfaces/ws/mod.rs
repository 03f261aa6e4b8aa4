//! WebSocket interface for real-time UI notifications

pub mod notifications;

pub use notifications::{create_notification_state, ws_notifications_handler, EventFilter};
