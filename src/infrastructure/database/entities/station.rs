//! Station entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    /// Hardware category: PC, PLAYSTATION, XBOX, VR, SIMULATOR
    pub station_type: String,

    /// Occupancy status: AVAILABLE, ACTIVE, MAINTENANCE
    pub status: String,

    /// Rate card; NULL falls back to the default hourly rate
    #[sea_orm(nullable, column_type = "Double")]
    pub rate_per_hour: Option<f64>,

    /// Rate card; NULL falls back to the default per-game rate
    #[sea_orm(nullable, column_type = "Double")]
    pub rate_per_game: Option<f64>,

    #[sea_orm(nullable)]
    pub maintenance_reason: Option<String>,

    #[sea_orm(nullable)]
    pub maintenance_eta: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session::Entity")]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
