//! Station aggregate: model + repository interface

pub mod model;
pub mod repository;

pub use model::{Station, StationStatus, StationType, DEFAULT_GAME_RATE, DEFAULT_HOURLY_RATE};
pub use repository::StationRepository;
