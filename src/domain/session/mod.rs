//! Session aggregate: model + repository interface

pub mod model;
pub mod repository;

pub use model::{Session, SessionStatus, SessionType};
pub use repository::SessionRepository;
