//! Error taxonomy shared across layers
//!
//! Every failure kind a caller may need to distinguish gets its own
//! variant, because the retry strategy differs per kind (a missing
//! station is not retryable, a provider timeout is).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Operation not valid for the entity's current state
    /// (ending a non-active session, starting on a busy station).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation: {0}")]
    Validation(String),

    /// Split part amounts do not sum to the original total. Blocks
    /// payment actions until the caller fixes the plan; not fatal.
    #[error("Split imbalance: parts sum to {actual:.2}, expected {expected:.2}")]
    SplitImbalance { expected: f64, actual: f64 },

    /// Mobile-money provider error or timeout. Safe to retry; no state
    /// was mutated.
    #[error("External service failure: {0}")]
    ExternalService(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Infra(#[from] InfraError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = DomainError::not_found("Station", "id", 7);
        assert_eq!(err.to_string(), "Not found: Station with id=7");
    }

    #[test]
    fn split_imbalance_message_carries_both_sums() {
        let err = DomainError::SplitImbalance {
            expected: 900.0,
            actual: 850.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("850.50"));
        assert!(msg.contains("900.00"));
    }
}
