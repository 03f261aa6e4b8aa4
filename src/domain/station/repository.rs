//! Station repository interface

use async_trait::async_trait;

use super::model::{Station, StationStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Insert a new station; the returned value carries the assigned id.
    async fn create(&self, station: Station) -> DomainResult<Station>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>>;
    async fn find_all(&self) -> DomainResult<Vec<Station>>;
    async fn update(&self, station: Station) -> DomainResult<()>;

    /// Atomically claim an `Available` station for a new session:
    /// a single conditional UPDATE to `Active`. Returns `false` when the
    /// station was not `Available` at execution time, closing the
    /// read-then-write race on concurrent starts.
    async fn claim_available(&self, id: i32) -> DomainResult<bool>;

    /// Conditional `Active -> Available` transition on session close.
    /// Returns `false` if the station was not `Active` (e.g. an operator
    /// flipped it to maintenance mid-session).
    async fn release_active(&self, id: i32) -> DomainResult<bool>;

    async fn set_status(&self, id: i32, status: StationStatus) -> DomainResult<()>;
}
