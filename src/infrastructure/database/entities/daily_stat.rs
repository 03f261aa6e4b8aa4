//! Daily aggregate statistics entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_stats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Exactly one row per calendar date
    #[sea_orm(unique)]
    pub date: Date,

    pub active_stations: i32,
    pub active_users: i32,

    #[sea_orm(column_type = "Double")]
    pub total_hours: f64,

    #[sea_orm(column_type = "Double")]
    pub total_revenue: f64,

    /// JSON breakdown blob, serialized as text
    #[sea_orm(nullable)]
    pub station_utilization: Option<String>,

    /// JSON breakdown blob, serialized as text
    #[sea_orm(nullable)]
    pub popular_games: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
