//! Payment reconciler service
//!
//! Settles pending payments (in full or split into parts), awards
//! loyalty points on completion, and drives the mobile-money
//! confirmation protocol against the provider port.
//!
//! Failure policy: a provider error or timeout never mutates session or
//! payment state; the caller retries the whole operation. There is no
//! partial-commit state for a single attempt.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use log::{info, warn};
use uuid::Uuid;

use crate::application::ports::{CheckoutStatus, MobileMoneyProvider, QrHandle};
use crate::domain::{
    loyalty_points_for, DomainError, DomainResult, Payment, PaymentMethod, PaymentStatus,
    RepositoryProvider, SplitPlan, SPLIT_TOLERANCE,
};
use crate::notifications::{Event, PaymentEvent, SharedEventBus};
use crate::shared::ActivityLog;

/// Bounded-wait policy for mobile-money confirmation polling.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(5),
        }
    }
}

/// Result of a bounded confirmation wait.
#[derive(Debug)]
pub enum ConfirmOutcome {
    Completed(Payment),
    Failed(Payment),
    /// The poll budget ran out with the provider still pending; the
    /// payment stays `Pending` for manual reconciliation.
    Indeterminate,
}

/// An initiated mobile-money checkout tied to a pending payment.
#[derive(Debug, Clone)]
pub struct MpesaCheckout {
    pub checkout_id: String,
    pub payment_id: i32,
}

/// A QR checkout tied to a pending payment.
#[derive(Debug, Clone)]
pub struct QrCheckout {
    pub request_id: String,
    pub payment_id: i32,
    pub qr_image: String,
}

/// Service for payment settlement
pub struct PaymentReconciler {
    repos: Arc<dyn RepositoryProvider>,
    provider: Arc<dyn MobileMoneyProvider>,
    event_bus: SharedEventBus,
    activity: Arc<ActivityLog>,
    poll: PollConfig,
    /// Active split plans, keyed by plan id. Plans are working state of
    /// the settlement dialog; the payment rows they produce are the
    /// durable record.
    splits: DashMap<String, SplitPlan>,
    /// In-flight mobile-money checkouts -> payment ids.
    checkouts: DashMap<String, i32>,
}

impl PaymentReconciler {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        provider: Arc<dyn MobileMoneyProvider>,
        event_bus: SharedEventBus,
        activity: Arc<ActivityLog>,
        poll: PollConfig,
    ) -> Self {
        Self {
            repos,
            provider,
            event_bus,
            activity,
            poll,
            splits: DashMap::new(),
            checkouts: DashMap::new(),
        }
    }

    // ── Full settlement ────────────────────────────────────────

    /// Settle one pending payment row.
    pub async fn settle(
        &self,
        payment_id: i32,
        method: PaymentMethod,
        customer_id: Option<i32>,
        reference: Option<String>,
    ) -> DomainResult<Payment> {
        let payment = self
            .repos
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "id", payment_id))?;
        self.complete_payment(payment, method, customer_id, reference).await
    }

    /// Settle a session's charge in full: completes its pending payment
    /// row, or records a completed one when none exists yet.
    pub async fn settle_session(
        &self,
        session_id: i32,
        method: PaymentMethod,
        amount: f64,
        customer_id: Option<i32>,
    ) -> DomainResult<Payment> {
        if amount <= 0.0 {
            return Err(DomainError::Validation(format!(
                "payment amount must be positive, got {}",
                amount
            )));
        }
        let session = self
            .repos
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", "id", session_id))?;

        let pending = self
            .repos
            .payments()
            .find_by_session(session_id)
            .await?
            .into_iter()
            .find(|p| p.is_pending());

        let payment = match pending {
            Some(mut p) => {
                p.amount = amount;
                p
            }
            None => {
                self.repos
                    .payments()
                    .create(Payment::pending_for_session(
                        session_id,
                        Some(session.customer_id),
                        amount,
                    ))
                    .await?
            }
        };

        self.complete_payment(payment, method, customer_id.or(Some(session.customer_id)), None)
            .await
    }

    /// Common completion path: flips the row to `Completed`, awards
    /// loyalty points, emits the event and fires the fully-settled hook.
    async fn complete_payment(
        &self,
        mut payment: Payment,
        method: PaymentMethod,
        customer_id: Option<i32>,
        reference: Option<String>,
    ) -> DomainResult<Payment> {
        if !payment.is_pending() {
            return Err(DomainError::InvalidState(format!(
                "payment {} is already {}",
                payment.id,
                payment.status.as_str()
            )));
        }

        payment.complete(method, reference);
        self.repos.payments().update(payment.clone()).await?;

        let beneficiary = customer_id.or(payment.customer_id);
        if let Some(customer_id) = beneficiary {
            let points = loyalty_points_for(payment.amount);
            if points > 0 {
                self.repos
                    .customers()
                    .add_loyalty_points(customer_id, points)
                    .await?;
                info!(
                    "Customer {} earned {} loyalty points on payment {}",
                    customer_id, points, payment.id
                );
            }
        }

        metrics::counter!("pos_payments_completed_total").increment(1);
        self.activity.record(
            "payment",
            format!(
                "payment {} of {} settled via {}",
                payment.id,
                payment.amount,
                payment.method.as_str()
            ),
        );
        self.event_bus
            .publish(Event::PaymentCompleted(self.payment_event(&payment)));

        if let Some(session_id) = payment.session_id {
            self.check_fully_settled(session_id).await?;
        }
        Ok(payment)
    }

    /// Fully-settled hook: fires once the completed rows cover the
    /// session's derived charge.
    async fn check_fully_settled(&self, session_id: i32) -> DomainResult<()> {
        let Some(session) = self.repos.sessions().find_by_id(session_id).await? else {
            return Ok(());
        };
        let Some(total) = session.total_amount else {
            return Ok(());
        };
        let paid = self
            .repos
            .payments()
            .completed_total_for_session(session_id)
            .await?;
        if paid + SPLIT_TOLERANCE >= total {
            info!("Session {} fully settled ({} of {})", session_id, paid, total);
            self.activity
                .record("payment", format!("session {} fully settled", session_id));
        }
        Ok(())
    }

    // ── Split payments ─────────────────────────────────────────

    /// Divide a charge into evenly split, independently payable parts.
    pub async fn create_split(
        &self,
        session_id: Option<i32>,
        total: f64,
        part_count: usize,
    ) -> DomainResult<SplitPlan> {
        if let Some(session_id) = session_id {
            let session = self
                .repos
                .sessions()
                .find_by_id(session_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Session", "id", session_id))?;
            if let Some(expected) = session.total_amount {
                if (expected - total).abs() > SPLIT_TOLERANCE {
                    return Err(DomainError::Validation(format!(
                        "split total {} does not match the session charge {}",
                        total, expected
                    )));
                }
            }
        }

        let plan = SplitPlan::new(session_id, total, part_count)?;
        self.activity.record(
            "payment",
            format!("charge of {} split into {} parts", total, part_count),
        );
        self.splits.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    pub fn get_split(&self, plan_id: &str) -> DomainResult<SplitPlan> {
        self.splits
            .get(plan_id)
            .map(|p| p.clone())
            .ok_or_else(|| DomainError::not_found("SplitPlan", "id", plan_id))
    }

    pub fn set_split_part_count(&self, plan_id: &str, count: usize) -> DomainResult<SplitPlan> {
        let mut plan = self
            .splits
            .get_mut(plan_id)
            .ok_or_else(|| DomainError::not_found("SplitPlan", "id", plan_id))?;
        plan.set_part_count(count)?;
        Ok(plan.clone())
    }

    pub fn remove_split_part(&self, plan_id: &str, index: usize) -> DomainResult<SplitPlan> {
        let mut plan = self
            .splits
            .get_mut(plan_id)
            .ok_or_else(|| DomainError::not_found("SplitPlan", "id", plan_id))?;
        plan.remove_part(index)?;
        Ok(plan.clone())
    }

    pub fn set_split_part_amount(
        &self,
        plan_id: &str,
        index: usize,
        amount: f64,
    ) -> DomainResult<SplitPlan> {
        let mut plan = self
            .splits
            .get_mut(plan_id)
            .ok_or_else(|| DomainError::not_found("SplitPlan", "id", plan_id))?;
        plan.set_part_amount(index, amount)?;
        Ok(plan.clone())
    }

    /// Pay one part: the plan must balance to its total first, then the
    /// part gets its own completed payment row with full settlement
    /// semantics (loyalty included). Paying the last part fires the
    /// fully-settled hook through the common completion path.
    pub async fn pay_split_part(
        &self,
        plan_id: &str,
        index: usize,
        method: PaymentMethod,
        customer_id: Option<i32>,
    ) -> DomainResult<(SplitPlan, Payment)> {
        // Snapshot under the map lock, mutate after the awaits.
        let (session_id, amount) = {
            let plan = self
                .splits
                .get(plan_id)
                .ok_or_else(|| DomainError::not_found("SplitPlan", "id", plan_id))?;
            plan.check_balance()?;
            let part = plan
                .parts
                .get(index)
                .ok_or_else(|| DomainError::not_found("SplitPart", "index", index))?;
            if part.paid {
                return Err(DomainError::InvalidState(format!(
                    "part {} is already paid",
                    index
                )));
            }
            (plan.session_id, part.amount)
        };

        let customer_id = match (customer_id, session_id) {
            (Some(id), _) => Some(id),
            (None, Some(session_id)) => self
                .repos
                .sessions()
                .find_by_id(session_id)
                .await?
                .map(|s| s.customer_id),
            (None, None) => None,
        };

        let pending = match session_id {
            Some(session_id) => Payment::pending_for_session(session_id, customer_id, amount),
            None => Payment::pending_adhoc(customer_id, amount),
        };
        let created = self.repos.payments().create(pending).await?;
        let payment = self
            .complete_payment(created, method, customer_id, None)
            .await?;

        let mut plan = self
            .splits
            .get_mut(plan_id)
            .ok_or_else(|| DomainError::not_found("SplitPlan", "id", plan_id))?;
        plan.mark_paid(index, payment.id)?;
        let snapshot = plan.clone();
        drop(plan);

        if snapshot.is_fully_paid() {
            self.activity
                .record("payment", format!("split plan {} fully paid", plan_id));
            self.splits.remove(plan_id);
        }
        Ok((snapshot, payment))
    }

    // ── Mobile money ───────────────────────────────────────────

    /// Start an STK-push checkout. The payment row is only created once
    /// the provider accepted the initiation, so a provider failure
    /// leaves nothing behind.
    pub async fn initiate_mpesa(
        &self,
        phone: &str,
        amount: f64,
        session_id: Option<i32>,
        customer_id: Option<i32>,
    ) -> DomainResult<MpesaCheckout> {
        let txn_id = format!("POS-{}", Uuid::new_v4());
        let handle = self
            .provider
            .initiate(phone, amount, &txn_id)
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        let payment = self.pending_mpesa_payment(session_id, customer_id, amount).await?;
        self.checkouts.insert(handle.checkout_id.clone(), payment.id);

        info!(
            "M-PESA checkout {} initiated for payment {} ({})",
            handle.checkout_id, payment.id, amount
        );
        Ok(MpesaCheckout {
            checkout_id: handle.checkout_id,
            payment_id: payment.id,
        })
    }

    /// QR flavor of the same confirmation protocol, keyed by the
    /// generated request id.
    pub async fn initiate_qr(
        &self,
        amount: f64,
        session_id: Option<i32>,
        customer_id: Option<i32>,
        reference: Option<&str>,
    ) -> DomainResult<QrCheckout> {
        let txn_id = format!("POS-{}", Uuid::new_v4());
        let QrHandle {
            request_id,
            qr_image,
        } = self
            .provider
            .generate_qr(amount, &txn_id, reference)
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        let payment = self.pending_mpesa_payment(session_id, customer_id, amount).await?;
        self.checkouts.insert(request_id.clone(), payment.id);

        info!(
            "M-PESA QR checkout {} created for payment {} ({})",
            request_id, payment.id, amount
        );
        Ok(QrCheckout {
            request_id,
            payment_id: payment.id,
            qr_image,
        })
    }

    async fn pending_mpesa_payment(
        &self,
        session_id: Option<i32>,
        customer_id: Option<i32>,
        amount: f64,
    ) -> DomainResult<Payment> {
        if amount <= 0.0 {
            return Err(DomainError::Validation(format!(
                "payment amount must be positive, got {}",
                amount
            )));
        }
        let mut pending = match session_id {
            Some(session_id) => Payment::pending_for_session(session_id, customer_id, amount),
            None => Payment::pending_adhoc(customer_id, amount),
        };
        pending.method = PaymentMethod::Mpesa;
        let payment = self.repos.payments().create(pending).await?;
        self.event_bus
            .publish(Event::PaymentCreated(self.payment_event(&payment)));
        Ok(payment)
    }

    /// One status poll, applying a terminal answer to the payment. The
    /// payment only ever becomes `Completed` on an explicit completed
    /// status from the provider.
    pub async fn check_mpesa(&self, checkout_id: &str) -> DomainResult<CheckoutStatus> {
        let payment_id = self
            .checkouts
            .get(checkout_id)
            .map(|p| *p)
            .ok_or_else(|| DomainError::not_found("Checkout", "id", checkout_id))?;

        let status = self
            .provider
            .check_status(checkout_id)
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        match &status {
            CheckoutStatus::Completed { receipt } => {
                let payment = self
                    .repos
                    .payments()
                    .find_by_id(payment_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Payment", "id", payment_id))?;
                // A concurrent poll may have settled it already.
                if payment.is_pending() {
                    self.complete_payment(
                        payment,
                        PaymentMethod::Mpesa,
                        None,
                        Some(receipt.clone()),
                    )
                    .await?;
                }
                self.checkouts.remove(checkout_id);
            }
            CheckoutStatus::Failed { reason } => {
                let mut payment = self
                    .repos
                    .payments()
                    .find_by_id(payment_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Payment", "id", payment_id))?;
                if payment.is_pending() {
                    payment.fail(Some(reason.clone()));
                    self.repos.payments().update(payment).await?;
                    warn!("M-PESA checkout {} failed: {}", checkout_id, reason);
                }
                self.checkouts.remove(checkout_id);
            }
            CheckoutStatus::Pending => {}
        }
        Ok(status)
    }

    /// Bounded confirmation wait: poll at the configured interval, at
    /// most `max_attempts` times. When the budget runs out the payment
    /// is left pending for manual reconciliation; this is the
    /// deliberate fallback, not an error.
    pub async fn await_confirmation(&self, checkout_id: &str) -> DomainResult<ConfirmOutcome> {
        let payment_id = self
            .checkouts
            .get(checkout_id)
            .map(|p| *p)
            .ok_or_else(|| DomainError::not_found("Checkout", "id", checkout_id))?;

        for attempt in 1..=self.poll.max_attempts {
            match self.check_mpesa(checkout_id).await? {
                CheckoutStatus::Completed { .. } => {
                    let payment = self.require_payment(payment_id).await?;
                    return Ok(ConfirmOutcome::Completed(payment));
                }
                CheckoutStatus::Failed { .. } => {
                    let payment = self.require_payment(payment_id).await?;
                    return Ok(ConfirmOutcome::Failed(payment));
                }
                CheckoutStatus::Pending => {
                    if attempt < self.poll.max_attempts {
                        tokio::time::sleep(self.poll.interval).await;
                    }
                }
            }
        }

        warn!(
            "M-PESA checkout {} still pending after {} polls, left for manual reconciliation",
            checkout_id, self.poll.max_attempts
        );
        self.activity.record(
            "payment",
            format!("checkout {} unconfirmed, needs manual review", checkout_id),
        );
        Ok(ConfirmOutcome::Indeterminate)
    }

    async fn require_payment(&self, id: i32) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "id", id))
    }

    // ── Queries ────────────────────────────────────────────────

    pub async fn get(&self, id: i32) -> DomainResult<Payment> {
        self.require_payment(id).await
    }

    pub async fn list(&self) -> DomainResult<Vec<Payment>> {
        self.repos.payments().find_all().await
    }

    pub async fn for_session(&self, session_id: i32) -> DomainResult<Vec<Payment>> {
        self.repos.payments().find_by_session(session_id).await
    }

    fn payment_event(&self, payment: &Payment) -> PaymentEvent {
        PaymentEvent {
            payment_id: payment.id,
            session_id: payment.session_id,
            station_id: None,
            amount: payment.amount,
            method: payment.method.as_str().to_string(),
            status: payment.status.as_str().to_string(),
            timestamp: Utc::now(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::super::test_support::MemoryRepos;
    use super::*;
    use crate::application::ports::{SimBehavior, SimulatedMobileMoney};
    use crate::domain::{Customer, Session, SessionStatus, SessionType};
    use crate::notifications::create_event_bus;

    struct Fixture {
        repos: Arc<MemoryRepos>,
        reconciler: PaymentReconciler,
    }

    fn fixture_with(behavior: SimBehavior) -> Fixture {
        let repos = Arc::new(MemoryRepos::new());
        let provider_repos: Arc<dyn RepositoryProvider> = repos.clone();
        let reconciler = PaymentReconciler::new(
            provider_repos,
            Arc::new(SimulatedMobileMoney::with_behavior(behavior)),
            create_event_bus(),
            Arc::new(ActivityLog::new()),
            PollConfig {
                max_attempts: 5,
                interval: Duration::from_millis(0),
            },
        );
        Fixture { repos, reconciler }
    }

    fn fixture() -> Fixture {
        fixture_with(SimBehavior::CompleteAfter(0))
    }

    async fn seed_customer(fx: &Fixture) -> Customer {
        fx.repos
            .customers()
            .create(Customer::new(0, "Wanjiku", "+254700000001"))
            .await
            .unwrap()
    }

    /// A completed session with a pending payment, like the ledger
    /// leaves behind.
    async fn seed_billed_session(fx: &Fixture, customer_id: i32, total: f64) -> (Session, Payment) {
        let mut session = Session::new(1, customer_id, None, SessionType::Hourly, 200.0, None);
        session.status = SessionStatus::Completed;
        session.end_time = Some(Utc::now());
        session.duration_minutes = Some(60);
        session.total_amount = Some(total);
        let session = fx.repos.sessions().create(session).await.unwrap();
        let payment = fx
            .repos
            .payments()
            .create(Payment::pending_for_session(
                session.id,
                Some(customer_id),
                total,
            ))
            .await
            .unwrap();
        (session, payment)
    }

    #[tokio::test]
    async fn settle_session_completes_payment_and_awards_points() {
        let fx = fixture();
        let customer = seed_customer(&fx).await;
        let (session, _payment) = seed_billed_session(&fx, customer.id, 250.0).await;

        let paid = fx
            .reconciler
            .settle_session(session.id, PaymentMethod::Cash, 250.0, Some(customer.id))
            .await
            .unwrap();
        assert_eq!(paid.status, PaymentStatus::Completed);
        assert_eq!(paid.method, PaymentMethod::Cash);

        let customer = fx.repos.customers().find_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(customer.loyalty_points, 2);
    }

    #[tokio::test]
    async fn payment_of_99_awards_no_points() {
        let fx = fixture();
        let customer = seed_customer(&fx).await;
        let (session, _payment) = seed_billed_session(&fx, customer.id, 99.0).await;

        fx.reconciler
            .settle_session(session.id, PaymentMethod::Cash, 99.0, Some(customer.id))
            .await
            .unwrap();
        let customer = fx.repos.customers().find_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(customer.loyalty_points, 0);
    }

    #[tokio::test]
    async fn completed_payment_cannot_be_settled_again() {
        let fx = fixture();
        let customer = seed_customer(&fx).await;
        let (_session, payment) = seed_billed_session(&fx, customer.id, 200.0).await;

        fx.reconciler
            .settle(payment.id, PaymentMethod::Cash, None, None)
            .await
            .unwrap();
        let err = fx
            .reconciler
            .settle(payment.id, PaymentMethod::Cash, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn settle_rejects_nonpositive_amount() {
        let fx = fixture();
        let customer = seed_customer(&fx).await;
        let (session, _payment) = seed_billed_session(&fx, customer.id, 200.0).await;
        let err = fx
            .reconciler
            .settle_session(session.id, PaymentMethod::Cash, 0.0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    // ── Splits ─────────────────────────────────────────────────

    #[tokio::test]
    async fn split_pay_all_parts_settles_session() {
        let fx = fixture();
        let customer = seed_customer(&fx).await;
        let (session, _) = seed_billed_session(&fx, customer.id, 900.0).await;

        let plan = fx
            .reconciler
            .create_split(Some(session.id), 900.0, 3)
            .await
            .unwrap();

        let (plan2, paid) = fx
            .reconciler
            .pay_split_part(&plan.id, 1, PaymentMethod::Cash, None)
            .await
            .unwrap();
        assert_eq!(paid.amount, 300.0);
        assert_eq!(plan2.paid_count(), 1);

        fx.reconciler
            .pay_split_part(&plan.id, 0, PaymentMethod::Cash, None)
            .await
            .unwrap();
        let (final_plan, _) = fx
            .reconciler
            .pay_split_part(&plan.id, 2, PaymentMethod::Mpesa, None)
            .await
            .unwrap();
        assert!(final_plan.is_fully_paid());

        // Plan is retired once fully paid.
        assert!(fx.reconciler.get_split(&plan.id).is_err());

        let total = fx
            .repos
            .payments()
            .completed_total_for_session(session.id)
            .await
            .unwrap();
        assert!((total - 900.0).abs() < SPLIT_TOLERANCE);
    }

    #[tokio::test]
    async fn imbalanced_split_blocks_payment() {
        let fx = fixture();
        let plan = fx.reconciler.create_split(None, 900.0, 3).await.unwrap();
        fx.reconciler
            .set_split_part_amount(&plan.id, 0, 100.0)
            .unwrap();

        let err = fx
            .reconciler
            .pay_split_part(&plan.id, 0, PaymentMethod::Cash, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SplitImbalance { .. }));
        // Nothing was charged.
        assert!(fx.repos.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn split_total_must_match_session_charge() {
        let fx = fixture();
        let customer = seed_customer(&fx).await;
        let (session, _) = seed_billed_session(&fx, customer.id, 900.0).await;
        let err = fx
            .reconciler
            .create_split(Some(session.id), 500.0, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn split_part_loyalty_accrues_per_part() {
        let fx = fixture();
        let customer = seed_customer(&fx).await;
        let (session, _) = seed_billed_session(&fx, customer.id, 900.0).await;
        let plan = fx
            .reconciler
            .create_split(Some(session.id), 900.0, 3)
            .await
            .unwrap();

        fx.reconciler
            .pay_split_part(&plan.id, 0, PaymentMethod::Cash, None)
            .await
            .unwrap();
        let c = fx.repos.customers().find_by_id(customer.id).await.unwrap().unwrap();
        // floor(300 / 100) from the first part only.
        assert_eq!(c.loyalty_points, 3);
    }

    // ── Mobile money ───────────────────────────────────────────

    #[tokio::test]
    async fn provider_rejection_leaves_no_payment_behind() {
        let fx = fixture();
        let err = fx
            .reconciler
            .initiate_mpesa("", 200.0, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(_)));
        assert!(fx.repos.payments.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn confirmation_completes_on_provider_completed() {
        // Terminal on the 5th poll, inside the budget.
        let fx = fixture_with(SimBehavior::CompleteAfter(4));
        let customer = seed_customer(&fx).await;
        let checkout = fx
            .reconciler
            .initiate_mpesa("+254700000001", 600.0, None, Some(customer.id))
            .await
            .unwrap();

        let outcome = fx
            .reconciler
            .await_confirmation(&checkout.checkout_id)
            .await
            .unwrap();
        let payment = match outcome {
            ConfirmOutcome::Completed(p) => p,
            other => panic!("expected Completed, got {:?}", other),
        };
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.method, PaymentMethod::Mpesa);
        assert!(payment.reference.is_some());

        let customer = fx.repos.customers().find_by_id(customer.id).await.unwrap().unwrap();
        assert_eq!(customer.loyalty_points, 6);
    }

    #[tokio::test]
    async fn polling_stops_after_five_attempts() {
        // One poll past the budget would complete it; the bound must
        // leave the payment pending instead.
        let fx = fixture_with(SimBehavior::CompleteAfter(5));
        let checkout = fx
            .reconciler
            .initiate_mpesa("+254700000001", 600.0, None, None)
            .await
            .unwrap();

        let outcome = fx
            .reconciler
            .await_confirmation(&checkout.checkout_id)
            .await
            .unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Indeterminate));

        let payment = fx
            .repos
            .payments()
            .find_by_id(checkout.payment_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn failed_checkout_marks_payment_failed() {
        let fx = fixture_with(SimBehavior::FailAfter(1));
        let checkout = fx
            .reconciler
            .initiate_mpesa("+254700000001", 600.0, None, None)
            .await
            .unwrap();

        let outcome = fx
            .reconciler
            .await_confirmation(&checkout.checkout_id)
            .await
            .unwrap();
        let payment = match outcome {
            ConfirmOutcome::Failed(p) => p,
            other => panic!("expected Failed, got {:?}", other),
        };
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert!(payment.reference.is_some());
    }

    #[tokio::test]
    async fn qr_checkout_follows_same_protocol() {
        let fx = fixture_with(SimBehavior::CompleteAfter(1));
        let checkout = fx
            .reconciler
            .initiate_qr(250.0, None, None, Some("station 3"))
            .await
            .unwrap();
        assert!(!checkout.qr_image.is_empty());

        let outcome = fx
            .reconciler
            .await_confirmation(&checkout.request_id)
            .await
            .unwrap();
        assert!(matches!(outcome, ConfirmOutcome::Completed(_)));
    }
}
