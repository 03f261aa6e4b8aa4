//! Payment repository interface

use async_trait::async_trait;

use super::model::Payment;
use crate::domain::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a new payment; the returned value carries the assigned id.
    async fn create(&self, payment: Payment) -> DomainResult<Payment>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>>;
    async fn find_by_session(&self, session_id: i32) -> DomainResult<Vec<Payment>>;
    async fn find_all(&self) -> DomainResult<Vec<Payment>>;
    async fn update(&self, payment: Payment) -> DomainResult<()>;
    /// Sum of `Completed` payment amounts linked to the session, across
    /// all split parts.
    async fn completed_total_for_session(&self, session_id: i32) -> DomainResult<f64>;
}
