//! Customer repository interface

use async_trait::async_trait;

use super::model::Customer;
use crate::domain::DomainResult;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a new customer; the returned value carries the assigned id.
    async fn create(&self, customer: Customer) -> DomainResult<Customer>;
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Customer>>;
    async fn find_all(&self) -> DomainResult<Vec<Customer>>;
    async fn update(&self, customer: Customer) -> DomainResult<()>;
    async fn delete(&self, id: i32) -> DomainResult<()>;
    /// Atomically add points to the customer's balance.
    async fn add_loyalty_points(&self, id: i32, points: i64) -> DomainResult<()>;
}
