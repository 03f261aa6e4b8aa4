pub mod dto;
pub mod handlers;

pub use dto::{CreateStationRequest, MaintenanceRequest, StationDto, UpdateStationRequest};
pub use handlers::*;
