//! Session DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Session, SessionType};
use crate::shared::errors::DomainError;

/// Play session DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub id: i32,
    pub station_id: i32,
    pub customer_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<i32>,
    pub session_type: String,
    pub rate: f64,
    pub status: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_minutes: Option<i32>,
    /// Charge due if the session ended right now; only set while active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_charge: Option<f64>,
}

impl SessionDto {
    pub fn from_domain(s: Session) -> Self {
        let current_charge = s.is_active().then(|| s.charge_at(Utc::now()));
        Self {
            id: s.id,
            station_id: s.station_id,
            customer_id: s.customer_id,
            game_id: s.game_id,
            session_type: s.session_type.as_str().to_string(),
            rate: s.rate,
            status: s.status.as_str().to_string(),
            start_time: s.start_time,
            end_time: s.end_time,
            duration_minutes: s.duration_minutes,
            total_amount: s.total_amount,
            planned_minutes: s.planned_minutes,
            current_charge,
        }
    }
}

/// Parse a wire session type, mapping bad input to a validation error.
pub fn parse_session_type(s: &str) -> Result<SessionType, DomainError> {
    SessionType::from_str(s)
        .ok_or_else(|| DomainError::Validation(format!("unknown session type: {}", s)))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StartSessionRequest {
    pub station_id: i32,
    pub customer_id: i32,
    pub game_id: Option<i32>,
    /// HOURLY or FIXED
    pub session_type: String,
    #[validate(range(min = 1, max = 1440))]
    pub planned_minutes: Option<i32>,
}

/// Session query filters
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct SessionFilter {
    pub station_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub status: Option<String>,
}
