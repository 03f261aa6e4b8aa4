//! SeaORM implementation of GameRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryOrder, Set,
};

use crate::domain::game::{Game, GameRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::game;

pub struct SeaOrmGameRepository {
    db: DatabaseConnection,
}

impl SeaOrmGameRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: game::Model) -> Game {
    Game {
        id: m.id,
        title: m.title,
        genre: m.genre,
        price_per_session: m.price_per_session,
        created_at: m.created_at,
    }
}

fn domain_to_active(g: &Game) -> game::ActiveModel {
    game::ActiveModel {
        id: Set(g.id),
        title: Set(g.title.clone()),
        genre: Set(g.genre.clone()),
        price_per_session: Set(g.price_per_session),
        created_at: Set(g.created_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── GameRepository impl ─────────────────────────────────────────

#[async_trait]
impl GameRepository for SeaOrmGameRepository {
    async fn create(&self, g: Game) -> DomainResult<Game> {
        debug!("Creating game: {}", g.title);
        let mut model = domain_to_active(&g);
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Game>> {
        let model = game::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Game>> {
        let models = game::Entity::find()
            .order_by_asc(game::Column::Title)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, g: Game) -> DomainResult<()> {
        let exists = game::Entity::find_by_id(g.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Game", "id", g.id));
        }
        domain_to_active(&g).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = game::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Game", "id", id));
        }
        Ok(())
    }
}
