//! Daily aggregate statistics service
//!
//! One row per calendar day, adjusted incrementally by the session
//! ledger and rebuildable on demand: the incremental counters are a
//! cache over the session table, so `recompute` can correct any skew
//! from missed or duplicated adjustments.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::info;

use crate::domain::{DailyStat, DomainResult, RepositoryProvider, StatDelta};

/// Service for daily aggregate counters
pub struct DailyStatsService {
    repos: Arc<dyn RepositoryProvider>,
}

impl DailyStatsService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Today's date in UTC; all stats rows are keyed on it.
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Today's row, created zeroed if absent.
    pub async fn get_or_create_today(&self) -> DomainResult<DailyStat> {
        self.repos.daily_stats().get_or_create(Self::today()).await
    }

    /// Apply a signed delta to a date's row. With `create_missing ==
    /// false` a missing row makes the call a no-op (the day-rollover
    /// edge on session end).
    pub async fn adjust(
        &self,
        date: NaiveDate,
        delta: &StatDelta,
        create_missing: bool,
    ) -> DomainResult<()> {
        self.repos.daily_stats().adjust(date, delta, create_missing).await
    }

    pub async fn range(&self, from: NaiveDate, to: NaiveDate) -> DomainResult<Vec<DailyStat>> {
        self.repos.daily_stats().range(from, to).await
    }

    /// Rebuild a date's row from the session table, overwriting the
    /// incremental counters. Completed sessions contribute hours and
    /// revenue; still-active sessions contribute the occupancy gauges.
    pub async fn recompute(&self, date: NaiveDate) -> DomainResult<DailyStat> {
        let completed = self.repos.sessions().find_completed_on(date).await?;
        let total_hours: f64 = completed
            .iter()
            .filter_map(|s| s.duration_minutes)
            .map(|m| m as f64 / 60.0)
            .sum();
        let total_revenue: f64 = completed.iter().filter_map(|s| s.total_amount).sum();

        let active = self.repos.sessions().find_active().await?;
        let running_today = active
            .iter()
            .filter(|s| s.start_time.date_naive() <= date)
            .count() as i32;

        let mut stat = DailyStat::zeroed(date);
        stat.active_stations = running_today;
        stat.active_users = running_today;
        stat.total_hours = total_hours;
        stat.total_revenue = total_revenue;

        self.repos.daily_stats().upsert(stat.clone()).await?;
        info!(
            "Daily stats for {} recomputed: {} sessions, {:.2} hours, {:.2} revenue",
            date,
            completed.len(),
            total_hours,
            total_revenue
        );
        Ok(stat)
    }
}
