//! Game catalog DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Game;

/// Game catalog entry DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameDto {
    pub id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_session: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl GameDto {
    pub fn from_domain(g: Game) -> Self {
        Self {
            id: g.id,
            title: g.title,
            genre: g.genre,
            price_per_session: g.price_per_session,
            created_at: g.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGameRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    #[validate(range(min = 0.0))]
    pub price_per_session: Option<f64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGameRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 50))]
    pub genre: Option<String>,
    #[validate(range(min = 0.0))]
    pub price_per_session: Option<f64>,
}
