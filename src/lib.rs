//! # Gamelounge POS Core
//!
//! Point-of-sale core service for a gaming lounge: station occupancy,
//! play-session billing, payment reconciliation (cash, M-PESA, splits),
//! loyalty accrual and daily aggregate statistics.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and repository traits
//! - **application**: Services (session ledger, payment reconciler,
//!   station registry, daily stats) and outbound ports (mobile money)
//! - **infrastructure**: SeaORM persistence and migrations
//! - **interfaces**: REST API with Swagger documentation + notification
//!   WebSocket
//! - **notifications**: Best-effort event fan-out to UI clients
//! - **shared**: Error taxonomy, activity log, shutdown coordination

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiContext};

// Re-export notifications
pub use notifications::{create_event_bus, Event, EventBus, SharedEventBus};
