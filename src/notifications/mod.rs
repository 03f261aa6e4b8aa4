//! Real-time notifications for UI clients
//!
//! Best-effort fan-out of structured events over a broadcast channel,
//! consumed by the WebSocket endpoint in `interfaces::ws`.

pub mod event_bus;
pub mod events;

pub use event_bus::{create_event_bus, EventBus, EventSubscriber, SharedEventBus};
pub use events::{
    CustomerEvent, Event, EventMessage, GameEvent, PaymentEvent, SessionEndedEvent, SessionEvent,
    StationEvent, StationMaintenanceEvent,
};
