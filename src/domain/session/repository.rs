//! Session repository interface

use async_trait::async_trait;
use chrono::NaiveDate;

use super::model::Session;
use crate::domain::DomainResult;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert a new session; the returned value carries the assigned id.
    async fn create(&self, session: Session) -> DomainResult<Session>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Session>>;
    async fn update(&self, session: Session) -> DomainResult<()>;
    /// The single `Active` session on a station, if any.
    async fn find_active_for_station(&self, station_id: i32) -> DomainResult<Option<Session>>;
    async fn find_active(&self) -> DomainResult<Vec<Session>>;
    async fn find_all(&self) -> DomainResult<Vec<Session>>;
    /// Sessions completed on the given calendar date (UTC), used by the
    /// daily-stats recomputation.
    async fn find_completed_on(&self, date: NaiveDate) -> DomainResult<Vec<Session>>;
}
