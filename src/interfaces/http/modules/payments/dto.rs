//! Payment DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{Payment, PaymentMethod, SplitPlan};
use crate::shared::errors::DomainError;

/// Payment DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentDto {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i32>,
    pub amount: f64,
    pub method: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl PaymentDto {
    pub fn from_domain(p: Payment) -> Self {
        Self {
            id: p.id,
            session_id: p.session_id,
            customer_id: p.customer_id,
            amount: p.amount,
            method: p.method.as_str().to_string(),
            status: p.status.as_str().to_string(),
            reference: p.reference,
            created_at: p.created_at,
            completed_at: p.completed_at,
        }
    }
}

/// Parse a tender method; `PENDING` is a placeholder, not a way to pay.
pub fn parse_settlement_method(s: &str) -> Result<PaymentMethod, DomainError> {
    match PaymentMethod::from_str(s) {
        Some(PaymentMethod::Pending) | None => Err(DomainError::Validation(format!(
            "settlement method must be CASH or MPESA, got {}",
            s
        ))),
        Some(method) => Ok(method),
    }
}

/// One part of a split plan
#[derive(Debug, Serialize, ToSchema)]
pub struct SplitPartDto {
    pub amount: f64,
    pub paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<i32>,
}

/// Split plan DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct SplitPlanDto {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i32>,
    pub total: f64,
    pub parts: Vec<SplitPartDto>,
    /// Whether the part amounts currently sum to the total. Payment
    /// actions are blocked while false.
    pub balanced: bool,
    pub fully_paid: bool,
}

impl SplitPlanDto {
    pub fn from_domain(plan: SplitPlan) -> Self {
        let balanced = plan.check_balance().is_ok();
        let fully_paid = plan.is_fully_paid();
        Self {
            id: plan.id,
            session_id: plan.session_id,
            total: plan.total,
            balanced,
            fully_paid,
            parts: plan
                .parts
                .into_iter()
                .map(|p| SplitPartDto {
                    amount: p.amount,
                    paid: p.paid,
                    payment_id: p.payment_id,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SettlePaymentRequest {
    /// CASH or MPESA
    pub method: String,
    pub customer_id: Option<i32>,
    #[validate(length(max = 50))]
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SettleSessionRequest {
    /// CASH or MPESA
    pub method: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    pub customer_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSplitRequest {
    pub session_id: Option<i32>,
    #[validate(range(min = 0.01))]
    pub total: f64,
    #[validate(range(min = 1, max = 16))]
    pub parts: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetPartCountRequest {
    #[validate(range(min = 1, max = 16))]
    pub count: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetPartAmountRequest {
    #[validate(range(min = 0.0))]
    pub amount: f64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PayPartRequest {
    /// CASH or MPESA
    pub method: String,
    pub customer_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InitiateMpesaRequest {
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(range(min = 0.01))]
    pub amount: f64,
    pub session_id: Option<i32>,
    pub customer_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QrMpesaRequest {
    #[validate(range(min = 0.01))]
    pub amount: f64,
    pub session_id: Option<i32>,
    pub customer_id: Option<i32>,
    #[validate(length(max = 100))]
    pub reference: Option<String>,
}

/// Initiated checkout handle for the UI to poll
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutDto {
    pub checkout_id: String,
    pub payment_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_image: Option<String>,
}

/// Single poll answer
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutStatusDto {
    /// pending, completed or failed
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Bounded-wait confirmation answer
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmOutcomeDto {
    /// completed, failed or indeterminate
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentDto>,
}

/// Payment query filters
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct PaymentFilter {
    pub session_id: Option<i32>,
    pub status: Option<String>,
    pub method: Option<String>,
}
