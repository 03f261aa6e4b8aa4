//! Session entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub station_id: i32,
    pub customer_id: i32,

    #[sea_orm(nullable)]
    pub game_id: Option<i32>,

    /// Billing mode: HOURLY, FIXED
    pub session_type: String,

    /// Rate snapshot taken at start
    #[sea_orm(column_type = "Double")]
    pub rate: f64,

    pub start_time: DateTimeUtc,

    #[sea_orm(nullable)]
    pub end_time: Option<DateTimeUtc>,

    /// Elapsed minutes (floor), populated at close
    #[sea_orm(nullable)]
    pub duration_minutes: Option<i32>,

    /// Lifecycle status: ACTIVE, COMPLETED, CANCELLED
    pub status: String,

    /// Derived charge, populated at close
    #[sea_orm(nullable, column_type = "Double")]
    pub total_amount: Option<f64>,

    #[sea_orm(nullable)]
    pub planned_minutes: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::StationId",
        to = "super::station::Column::Id"
    )]
    Station,

    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,

    #[sea_orm(
        belongs_to = "super::game::Entity",
        from = "Column::GameId",
        to = "super::game::Column::Id"
    )]
    Game,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::game::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Game.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
