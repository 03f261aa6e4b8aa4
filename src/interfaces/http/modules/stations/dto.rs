//! Station DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Station, StationType};
use crate::shared::errors::DomainError;

/// Gaming station DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StationDto {
    pub id: i32,
    pub name: String,
    pub station_type: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_per_hour: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_per_game: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_eta: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StationDto {
    pub fn from_domain(s: Station) -> Self {
        Self {
            id: s.id,
            name: s.name,
            station_type: s.station_type.as_str().to_string(),
            status: s.status.as_str().to_string(),
            rate_per_hour: s.rate_per_hour,
            rate_per_game: s.rate_per_game,
            maintenance_reason: s.maintenance_reason,
            maintenance_eta: s.maintenance_eta,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Parse a wire station type, mapping bad input to a validation error.
pub fn parse_station_type(s: &str) -> Result<StationType, DomainError> {
    StationType::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("unknown station type: {}", s)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// PC, PLAYSTATION, XBOX, VR or SIMULATOR
    pub station_type: String,
    #[validate(range(min = 0.0))]
    pub rate_per_hour: Option<f64>,
    #[validate(range(min = 0.0))]
    pub rate_per_game: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStationRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub station_type: Option<String>,
    #[validate(range(min = 0.0))]
    pub rate_per_hour: Option<f64>,
    #[validate(range(min = 0.0))]
    pub rate_per_game: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MaintenanceRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
    pub eta: Option<DateTime<Utc>>,
}
