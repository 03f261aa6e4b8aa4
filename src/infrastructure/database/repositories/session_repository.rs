//! SeaORM implementation of SessionRepository

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::session::{Session, SessionRepository, SessionStatus, SessionType};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::session;

pub struct SeaOrmSessionRepository {
    db: DatabaseConnection,
}

impl SeaOrmSessionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: session::Model) -> DomainResult<Session> {
    Ok(Session {
        id: m.id,
        station_id: m.station_id,
        customer_id: m.customer_id,
        game_id: m.game_id,
        session_type: SessionType::from_str(&m.session_type).ok_or_else(|| {
            DomainError::Storage(format!("unknown session type: {}", m.session_type))
        })?,
        status: SessionStatus::from_str(&m.status)
            .ok_or_else(|| DomainError::Storage(format!("unknown session status: {}", m.status)))?,
        rate: m.rate,
        start_time: m.start_time,
        end_time: m.end_time,
        duration_minutes: m.duration_minutes,
        total_amount: m.total_amount,
        planned_minutes: m.planned_minutes,
    })
}

fn domain_to_active(s: &Session) -> session::ActiveModel {
    session::ActiveModel {
        id: Set(s.id),
        station_id: Set(s.station_id),
        customer_id: Set(s.customer_id),
        game_id: Set(s.game_id),
        session_type: Set(s.session_type.as_str().to_string()),
        rate: Set(s.rate),
        start_time: Set(s.start_time),
        end_time: Set(s.end_time),
        duration_minutes: Set(s.duration_minutes),
        status: Set(s.status.as_str().to_string()),
        total_amount: Set(s.total_amount),
        planned_minutes: Set(s.planned_minutes),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── SessionRepository impl ──────────────────────────────────────

#[async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn create(&self, s: Session) -> DomainResult<Session> {
        debug!("Creating session on station {}", s.station_id);
        let mut model = domain_to_active(&s);
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(inserted)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Session>> {
        let model = session::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn update(&self, s: Session) -> DomainResult<()> {
        let exists = session::Entity::find_by_id(s.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Session", "id", s.id));
        }
        domain_to_active(&s).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_active_for_station(&self, station_id: i32) -> DomainResult<Option<Session>> {
        let model = session::Entity::find()
            .filter(session::Column::StationId.eq(station_id))
            .filter(session::Column::Status.eq(SessionStatus::Active.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_active(&self) -> DomainResult<Vec<Session>> {
        let models = session::Entity::find()
            .filter(session::Column::Status.eq(SessionStatus::Active.as_str()))
            .order_by_asc(session::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_all(&self) -> DomainResult<Vec<Session>> {
        let models = session::Entity::find()
            .order_by_desc(session::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_completed_on(&self, date: NaiveDate) -> DomainResult<Vec<Session>> {
        let day_start = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always valid")
            .and_utc();
        let day_end = day_start + Duration::days(1);

        let models = session::Entity::find()
            .filter(session::Column::Status.eq(SessionStatus::Completed.as_str()))
            .filter(session::Column::EndTime.gte(day_start))
            .filter(session::Column::EndTime.lt(day_end))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }
}
