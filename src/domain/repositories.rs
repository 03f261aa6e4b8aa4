//! Repository traits for the domain layer
//!
//! `RepositoryProvider` gives unified access to the per-aggregate
//! repositories; consumers request only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let station = repos.stations().find_by_id(1).await?;
//!     let session = repos.sessions().find_active_for_station(1).await?;
//! }
//! ```

use super::customer::CustomerRepository;
use super::game::GameRepository;
use super::payment::PaymentRepository;
use super::session::SessionRepository;
use super::station::StationRepository;
use super::stats::DailyStatRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Provides access to all domain repositories.
pub trait RepositoryProvider: Send + Sync {
    fn stations(&self) -> &dyn StationRepository;
    fn sessions(&self) -> &dyn SessionRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn customers(&self) -> &dyn CustomerRepository;
    fn games(&self) -> &dyn GameRepository;
    fn daily_stats(&self) -> &dyn DailyStatRepository;
}
