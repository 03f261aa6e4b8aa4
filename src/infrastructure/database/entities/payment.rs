//! Payment entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// NULL for ad-hoc transactions not tied to a session
    #[sea_orm(nullable)]
    pub session_id: Option<i32>,

    #[sea_orm(nullable)]
    pub customer_id: Option<i32>,

    #[sea_orm(column_type = "Double")]
    pub amount: f64,

    /// Tender: CASH, MPESA, PENDING
    pub method: String,

    /// Settlement status: PENDING, COMPLETED, FAILED
    pub status: String,

    /// External reference, e.g. a mobile-money transaction code
    #[sea_orm(nullable)]
    pub reference: Option<String>,

    pub created_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id"
    )]
    Session,

    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
