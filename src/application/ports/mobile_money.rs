//! Outbound port for the mobile-money provider
//!
//! [`MobileMoneyProvider`] is the architectural contract that decouples
//! the payment reconciler from the concrete provider integration. The
//! protocol is asynchronous: `initiate` (or `generate_qr`) returns a
//! handle, and the caller polls `check_status` until a terminal answer
//! or the bounded poll budget runs out.
//!
//! The single in-repo implementation is [`SimulatedMobileMoney`]; all
//! provider responses in the reference environment are simulated, but
//! any replacement must preserve the initiate + poll contract.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dashmap::DashMap;
use rand::Rng;
use thiserror::Error;

/// Provider-side failure (network, rejection, malformed response).
/// Never mutates payment state; callers retry the whole operation.
#[derive(Debug, Error)]
#[error("mobile money provider: {0}")]
pub struct ProviderError(pub String);

/// Status of an in-flight checkout. Terminal statuses are `Completed`
/// and `Failed`; there is no distinct "cancelled".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutStatus {
    Pending,
    Completed {
        /// Provider receipt code, recorded on the payment.
        receipt: String,
    },
    Failed {
        reason: String,
    },
}

impl CheckoutStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Handle returned by `initiate`.
#[derive(Debug, Clone)]
pub struct CheckoutHandle {
    pub checkout_id: String,
}

/// Handle returned by `generate_qr`: same confirmation protocol, keyed
/// by the generated request id instead of a phone-initiated checkout.
#[derive(Debug, Clone)]
pub struct QrHandle {
    pub request_id: String,
    /// Base64 PNG payload for the UI to render.
    pub qr_image: String,
}

#[async_trait]
pub trait MobileMoneyProvider: Send + Sync {
    /// Start a phone-initiated checkout for `amount`.
    async fn initiate(
        &self,
        phone: &str,
        amount: f64,
        txn_id: &str,
    ) -> Result<CheckoutHandle, ProviderError>;

    /// Poll an in-flight checkout (by checkout id or QR request id).
    async fn check_status(&self, checkout_id: &str) -> Result<CheckoutStatus, ProviderError>;

    /// Create a QR checkout for `amount`.
    async fn generate_qr(
        &self,
        amount: f64,
        txn_id: &str,
        reference: Option<&str>,
    ) -> Result<QrHandle, ProviderError>;
}

// ── Simulated provider ─────────────────────────────────────────

/// Scripted behavior of a simulated checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimBehavior {
    /// Report `Pending` for the first `n` polls, then `Completed`.
    CompleteAfter(u32),
    /// Report `Pending` for the first `n` polls, then `Failed`.
    FailAfter(u32),
    /// Never reach a terminal status (exercises the poll bound).
    AlwaysPending,
}

struct SimCheckout {
    polls: u32,
    behavior: SimBehavior,
}

/// In-memory provider stand-in used in the reference environment.
pub struct SimulatedMobileMoney {
    checkouts: DashMap<String, SimCheckout>,
    behavior: SimBehavior,
}

impl SimulatedMobileMoney {
    /// Checkouts complete after a couple of polls, like a customer
    /// confirming the STK push on their phone.
    pub fn new() -> Self {
        Self::with_behavior(SimBehavior::CompleteAfter(2))
    }

    pub fn with_behavior(behavior: SimBehavior) -> Self {
        Self {
            checkouts: DashMap::new(),
            behavior,
        }
    }

    fn register(&self, id: String) {
        self.checkouts.insert(
            id,
            SimCheckout {
                polls: 0,
                behavior: self.behavior,
            },
        );
    }

    fn receipt() -> String {
        // Receipt codes look like the provider's: 10 uppercase
        // alphanumerics.
        const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ0123456789";
        let mut rng = rand::thread_rng();
        (0..10)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect()
    }
}

impl Default for SimulatedMobileMoney {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MobileMoneyProvider for SimulatedMobileMoney {
    async fn initiate(
        &self,
        phone: &str,
        amount: f64,
        _txn_id: &str,
    ) -> Result<CheckoutHandle, ProviderError> {
        if phone.trim().is_empty() {
            return Err(ProviderError("phone number is required".into()));
        }
        if amount <= 0.0 {
            return Err(ProviderError(format!("invalid amount: {}", amount)));
        }
        let checkout_id = format!("CHK-{}", uuid::Uuid::new_v4());
        self.register(checkout_id.clone());
        Ok(CheckoutHandle { checkout_id })
    }

    async fn check_status(&self, checkout_id: &str) -> Result<CheckoutStatus, ProviderError> {
        let mut entry = self
            .checkouts
            .get_mut(checkout_id)
            .ok_or_else(|| ProviderError(format!("unknown checkout: {}", checkout_id)))?;
        entry.polls += 1;

        let status = match entry.behavior {
            SimBehavior::AlwaysPending => CheckoutStatus::Pending,
            SimBehavior::CompleteAfter(n) if entry.polls > n => CheckoutStatus::Completed {
                receipt: Self::receipt(),
            },
            SimBehavior::FailAfter(n) if entry.polls > n => CheckoutStatus::Failed {
                reason: "request declined by customer".into(),
            },
            _ => CheckoutStatus::Pending,
        };
        Ok(status)
    }

    async fn generate_qr(
        &self,
        amount: f64,
        txn_id: &str,
        reference: Option<&str>,
    ) -> Result<QrHandle, ProviderError> {
        if amount <= 0.0 {
            return Err(ProviderError(format!("invalid amount: {}", amount)));
        }
        let request_id = format!("QR-{}", uuid::Uuid::new_v4());
        self.register(request_id.clone());
        // A QR payload carrying the checkout parameters; a real
        // provider returns rendered PNG bytes here.
        let payload = format!(
            "{{\"request\":\"{}\",\"amount\":{:.2},\"txn\":\"{}\",\"ref\":\"{}\"}}",
            request_id,
            amount,
            txn_id,
            reference.unwrap_or_default()
        );
        Ok(QrHandle {
            request_id,
            qr_image: STANDARD.encode(payload.as_bytes()),
        })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initiate_then_complete_after_polls() {
        let provider = SimulatedMobileMoney::with_behavior(SimBehavior::CompleteAfter(2));
        let handle = provider.initiate("+254700000001", 600.0, "TXN-1").await.unwrap();

        assert_eq!(
            provider.check_status(&handle.checkout_id).await.unwrap(),
            CheckoutStatus::Pending
        );
        assert_eq!(
            provider.check_status(&handle.checkout_id).await.unwrap(),
            CheckoutStatus::Pending
        );
        let third = provider.check_status(&handle.checkout_id).await.unwrap();
        assert!(matches!(third, CheckoutStatus::Completed { .. }));
    }

    #[tokio::test]
    async fn failing_checkout_reports_reason() {
        let provider = SimulatedMobileMoney::with_behavior(SimBehavior::FailAfter(0));
        let handle = provider.initiate("+254700000001", 100.0, "TXN-2").await.unwrap();
        let status = provider.check_status(&handle.checkout_id).await.unwrap();
        assert!(matches!(status, CheckoutStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn rejects_bad_input_without_registering() {
        let provider = SimulatedMobileMoney::new();
        assert!(provider.initiate("", 100.0, "TXN-3").await.is_err());
        assert!(provider.initiate("+254700000001", 0.0, "TXN-4").await.is_err());
        assert!(provider.check_status("CHK-missing").await.is_err());
    }

    #[tokio::test]
    async fn qr_uses_same_confirmation_protocol() {
        let provider = SimulatedMobileMoney::with_behavior(SimBehavior::CompleteAfter(1));
        let qr = provider.generate_qr(250.0, "TXN-5", Some("station 3")).await.unwrap();
        assert!(!qr.qr_image.is_empty());

        assert_eq!(
            provider.check_status(&qr.request_id).await.unwrap(),
            CheckoutStatus::Pending
        );
        assert!(provider
            .check_status(&qr.request_id)
            .await
            .unwrap()
            .is_terminal());
    }
}
