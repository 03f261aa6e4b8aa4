//! SeaORM implementation of CustomerRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::customer::{Customer, CustomerRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::customer;

pub struct SeaOrmCustomerRepository {
    db: DatabaseConnection,
}

impl SeaOrmCustomerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: customer::Model) -> Customer {
    Customer {
        id: m.id,
        name: m.name,
        phone: m.phone,
        email: m.email,
        loyalty_points: m.loyalty_points,
        created_at: m.created_at,
    }
}

fn domain_to_active(c: &Customer) -> customer::ActiveModel {
    customer::ActiveModel {
        id: Set(c.id),
        name: Set(c.name.clone()),
        phone: Set(c.phone.clone()),
        email: Set(c.email.clone()),
        loyalty_points: Set(c.loyalty_points),
        created_at: Set(c.created_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── CustomerRepository impl ─────────────────────────────────────

#[async_trait]
impl CustomerRepository for SeaOrmCustomerRepository {
    async fn create(&self, c: Customer) -> DomainResult<Customer> {
        debug!("Creating customer: {}", c.name);
        let mut model = domain_to_active(&c);
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Customer>> {
        let model = customer::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<Customer>> {
        let models = customer::Entity::find()
            .order_by_asc(customer::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update(&self, c: Customer) -> DomainResult<()> {
        let exists = customer::Entity::find_by_id(c.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Customer", "id", c.id));
        }
        domain_to_active(&c).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = customer::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Customer", "id", id));
        }
        Ok(())
    }

    async fn add_loyalty_points(&self, id: i32, points: i64) -> DomainResult<()> {
        // Single additive UPDATE so concurrent settlements cannot lose
        // each other's points.
        let result = customer::Entity::update_many()
            .col_expr(
                customer::Column::LoyaltyPoints,
                Expr::col(customer::Column::LoyaltyPoints).add(points),
            )
            .filter(customer::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Customer", "id", id));
        }
        Ok(())
    }
}
