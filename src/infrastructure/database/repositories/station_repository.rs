//! SeaORM implementation of StationRepository

use async_trait::async_trait;
use chrono::Utc;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::station::{Station, StationRepository, StationStatus, StationType};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::station;

pub struct SeaOrmStationRepository {
    db: DatabaseConnection,
}

impl SeaOrmStationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: station::Model) -> DomainResult<Station> {
    Ok(Station {
        id: m.id,
        station_type: StationType::from_str(&m.station_type).ok_or_else(|| {
            DomainError::Storage(format!("unknown station type: {}", m.station_type))
        })?,
        status: StationStatus::from_str(&m.status)
            .ok_or_else(|| DomainError::Storage(format!("unknown station status: {}", m.status)))?,
        name: m.name,
        rate_per_hour: m.rate_per_hour,
        rate_per_game: m.rate_per_game,
        maintenance_reason: m.maintenance_reason,
        maintenance_eta: m.maintenance_eta,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(s: &Station) -> station::ActiveModel {
    station::ActiveModel {
        id: Set(s.id),
        name: Set(s.name.clone()),
        station_type: Set(s.station_type.as_str().to_string()),
        status: Set(s.status.as_str().to_string()),
        rate_per_hour: Set(s.rate_per_hour),
        rate_per_game: Set(s.rate_per_game),
        maintenance_reason: Set(s.maintenance_reason.clone()),
        maintenance_eta: Set(s.maintenance_eta),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── StationRepository impl ──────────────────────────────────────

#[async_trait]
impl StationRepository for SeaOrmStationRepository {
    async fn create(&self, s: Station) -> DomainResult<Station> {
        debug!("Creating station: {}", s.name);
        let mut model = domain_to_active(&s);
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(inserted)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        let model = station::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        let models = station::Entity::find()
            .order_by_asc(station::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn update(&self, s: Station) -> DomainResult<()> {
        let exists = station::Entity::find_by_id(s.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Station", "id", s.id));
        }
        domain_to_active(&s).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn claim_available(&self, id: i32) -> DomainResult<bool> {
        // Single conditional UPDATE so two concurrent starts cannot both
        // win the station.
        let result = station::Entity::update_many()
            .col_expr(
                station::Column::Status,
                Expr::value(StationStatus::Active.as_str()),
            )
            .col_expr(station::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(station::Column::Id.eq(id))
            .filter(station::Column::Status.eq(StationStatus::Available.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected == 1)
    }

    async fn release_active(&self, id: i32) -> DomainResult<bool> {
        let result = station::Entity::update_many()
            .col_expr(
                station::Column::Status,
                Expr::value(StationStatus::Available.as_str()),
            )
            .col_expr(station::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(station::Column::Id.eq(id))
            .filter(station::Column::Status.eq(StationStatus::Active.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected == 1)
    }

    async fn set_status(&self, id: i32, status: StationStatus) -> DomainResult<()> {
        let result = station::Entity::update_many()
            .col_expr(station::Column::Status, Expr::value(status.as_str()))
            .col_expr(station::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(station::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Station", "id", id));
        }
        Ok(())
    }
}
