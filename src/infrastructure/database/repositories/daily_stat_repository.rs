//! SeaORM implementation of DailyStatRepository
//!
//! The adjust path is a read-modify-write inside one database
//! transaction: today's row is a shared counter touched by every
//! session start and end, and a lost update would skew it permanently.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

use crate::domain::stats::{DailyStat, DailyStatRepository, StatDelta};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::daily_stat;

pub struct SeaOrmDailyStatRepository {
    db: DatabaseConnection,
}

impl SeaOrmDailyStatRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: daily_stat::Model) -> DailyStat {
    DailyStat {
        id: m.id,
        date: m.date,
        active_stations: m.active_stations,
        active_users: m.active_users,
        total_hours: m.total_hours,
        total_revenue: m.total_revenue,
        station_utilization: m.station_utilization,
        popular_games: m.popular_games,
    }
}

fn domain_to_active(s: &DailyStat) -> daily_stat::ActiveModel {
    daily_stat::ActiveModel {
        id: Set(s.id),
        date: Set(s.date),
        active_stations: Set(s.active_stations),
        active_users: Set(s.active_users),
        total_hours: Set(s.total_hours),
        total_revenue: Set(s.total_revenue),
        station_utilization: Set(s.station_utilization.clone()),
        popular_games: Set(s.popular_games.clone()),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── DailyStatRepository impl ────────────────────────────────────

#[async_trait]
impl DailyStatRepository for SeaOrmDailyStatRepository {
    async fn find_by_date(&self, date: NaiveDate) -> DomainResult<Option<DailyStat>> {
        let model = daily_stat::Entity::find()
            .filter(daily_stat::Column::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn get_or_create(&self, date: NaiveDate) -> DomainResult<DailyStat> {
        if let Some(existing) = self.find_by_date(date).await? {
            return Ok(existing);
        }
        debug!("Creating daily stats row for {}", date);
        let mut model = domain_to_active(&DailyStat::zeroed(date));
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn adjust(
        &self,
        date: NaiveDate,
        delta: &StatDelta,
        create_missing: bool,
    ) -> DomainResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = daily_stat::Entity::find()
            .filter(daily_stat::Column::Date.eq(date))
            .one(&txn)
            .await
            .map_err(db_err)?;

        let mut stat = match existing {
            Some(m) => model_to_domain(m),
            None if create_missing => {
                let mut model = domain_to_active(&DailyStat::zeroed(date));
                model.id = NotSet;
                let inserted = model.insert(&txn).await.map_err(db_err)?;
                model_to_domain(inserted)
            }
            None => {
                // Day-rollover case: nothing to decrement against.
                warn!("No daily stats row for {}, adjustment skipped", date);
                txn.rollback().await.map_err(db_err)?;
                return Ok(());
            }
        };

        stat.apply(delta);
        domain_to_active(&stat).update(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn upsert(&self, stat: DailyStat) -> DomainResult<()> {
        match self.find_by_date(stat.date).await? {
            Some(existing) => {
                let mut model = domain_to_active(&stat);
                model.id = Set(existing.id);
                model.update(&self.db).await.map_err(db_err)?;
            }
            None => {
                let mut model = domain_to_active(&stat);
                model.id = NotSet;
                model.insert(&self.db).await.map_err(db_err)?;
            }
        }
        Ok(())
    }

    async fn range(&self, from: NaiveDate, to: NaiveDate) -> DomainResult<Vec<DailyStat>> {
        let models = daily_stat::Entity::find()
            .filter(daily_stat::Column::Date.gte(from))
            .filter(daily_stat::Column::Date.lte(to))
            .order_by_asc(daily_stat::Column::Date)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }
}
