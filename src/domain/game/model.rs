//! Game catalog entry

use chrono::{DateTime, Utc};

/// A title offered in the lounge, optionally with a flat per-session
/// price used by `Fixed` sessions.
#[derive(Debug, Clone)]
pub struct Game {
    pub id: i32,
    pub title: String,
    pub genre: Option<String>,
    pub price_per_session: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Game {
    pub fn new(id: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            genre: None,
            price_per_session: None,
            created_at: Utc::now(),
        }
    }
}
