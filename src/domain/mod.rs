//! Core business entities, types and repository traits

pub mod customer;
pub mod game;
pub mod payment;
pub mod repositories;
pub mod session;
pub mod station;
pub mod stats;

// Re-export commonly used types
pub use customer::{loyalty_points_for, Customer, CustomerRepository};
pub use game::{Game, GameRepository};
pub use payment::{
    Payment, PaymentMethod, PaymentRepository, PaymentStatus, SplitPart, SplitPlan,
    SPLIT_TOLERANCE,
};
pub use repositories::{DomainResult, RepositoryProvider};
pub use session::{Session, SessionRepository, SessionStatus, SessionType};
pub use station::{
    Station, StationRepository, StationStatus, StationType, DEFAULT_GAME_RATE,
    DEFAULT_HOURLY_RATE,
};
pub use stats::{DailyStat, DailyStatRepository, StatDelta};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
