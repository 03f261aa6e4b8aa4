//! Daily statistics repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::{DailyStat, StatDelta};
use crate::domain::DomainResult;

#[async_trait]
pub trait DailyStatRepository: Send + Sync {
    async fn find_by_date(&self, date: NaiveDate) -> DomainResult<Option<DailyStat>>;
    /// The row for `date`, creating a zeroed one when absent. Exactly
    /// one row per date.
    async fn get_or_create(&self, date: NaiveDate) -> DomainResult<DailyStat>;
    /// Read-modify-write of the row inside a single database
    /// transaction. With `create_missing == false` a missing row makes
    /// the whole adjustment a no-op (the day-rollover case).
    async fn adjust(
        &self,
        date: NaiveDate,
        delta: &StatDelta,
        create_missing: bool,
    ) -> DomainResult<()>;
    /// Overwrite the row wholesale (used by recomputation).
    async fn upsert(&self, stat: DailyStat) -> DomainResult<()>;
    async fn range(&self, from: NaiveDate, to: NaiveDate) -> DomainResult<Vec<DailyStat>>;
}
