//! Game catalog repository interface

use async_trait::async_trait;

use super::model::Game;
use crate::domain::DomainResult;

#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Insert a new game; the returned value carries the assigned id.
    async fn create(&self, game: Game) -> DomainResult<Game>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Game>>;
    async fn find_all(&self) -> DomainResult<Vec<Game>>;
    async fn update(&self, game: Game) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
}
