//! SeaORM implementation of PaymentRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

use crate::domain::payment::{Payment, PaymentMethod, PaymentRepository, PaymentStatus};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::payment;

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: payment::Model) -> DomainResult<Payment> {
    Ok(Payment {
        id: m.id,
        session_id: m.session_id,
        customer_id: m.customer_id,
        amount: m.amount,
        method: PaymentMethod::from_str(&m.method)
            .ok_or_else(|| DomainError::Storage(format!("unknown payment method: {}", m.method)))?,
        status: PaymentStatus::from_str(&m.status)
            .ok_or_else(|| DomainError::Storage(format!("unknown payment status: {}", m.status)))?,
        reference: m.reference,
        created_at: m.created_at,
        completed_at: m.completed_at,
    })
}

fn domain_to_active(p: &Payment) -> payment::ActiveModel {
    payment::ActiveModel {
        id: Set(p.id),
        session_id: Set(p.session_id),
        customer_id: Set(p.customer_id),
        amount: Set(p.amount),
        method: Set(p.method.as_str().to_string()),
        status: Set(p.status.as_str().to_string()),
        reference: Set(p.reference.clone()),
        created_at: Set(p.created_at),
        completed_at: Set(p.completed_at),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

// ── PaymentRepository impl ──────────────────────────────────────

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn create(&self, p: Payment) -> DomainResult<Payment> {
        debug!(
            "Creating payment of {} for session {:?}",
            p.amount, p.session_id
        );
        let mut model = domain_to_active(&p);
        model.id = NotSet;
        let inserted = model.insert(&self.db).await.map_err(db_err)?;
        model_to_domain(inserted)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        model.map(model_to_domain).transpose()
    }

    async fn find_by_session(&self, session_id: i32) -> DomainResult<Vec<Payment>> {
        let models = payment::Entity::find()
            .filter(payment::Column::SessionId.eq(session_id))
            .order_by_asc(payment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn find_all(&self) -> DomainResult<Vec<Payment>> {
        let models = payment::Entity::find()
            .order_by_desc(payment::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        models.into_iter().map(model_to_domain).collect()
    }

    async fn update(&self, p: Payment) -> DomainResult<()> {
        let exists = payment::Entity::find_by_id(p.id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(DomainError::not_found("Payment", "id", p.id));
        }
        domain_to_active(&p).update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn completed_total_for_session(&self, session_id: i32) -> DomainResult<f64> {
        let models = payment::Entity::find()
            .filter(payment::Column::SessionId.eq(session_id))
            .filter(payment::Column::Status.eq(PaymentStatus::Completed.as_str()))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.iter().map(|m| m.amount).sum())
    }
}
