//! Split-payment plans
//!
//! A plan divides one charge into independently payable parts. Paid
//! parts are frozen; whenever parts are added or removed, the unpaid
//! remainder (`total - sum of paid parts`) is redistributed evenly over
//! the unpaid parts. That even split is the single redistribution rule
//! this system uses.
//!
//! Manual per-part edits may leave the plan unbalanced; the imbalance
//! is surfaced as [`DomainError::SplitImbalance`] and blocks payment
//! actions until the caller fixes the amounts. It is a condition to
//! present, not a hard rejection of the edit itself.

use serde::Serialize;
use uuid::Uuid;

use crate::shared::errors::DomainError;

/// Tolerance when comparing part sums to the plan total.
pub const SPLIT_TOLERANCE: f64 = 0.01;

/// Upper bound on parts per plan; more would be operator error.
pub const MAX_PARTS: usize = 16;

/// One independently payable slice of a charge
#[derive(Debug, Clone, Serialize)]
pub struct SplitPart {
    pub amount: f64,
    pub paid: bool,
    /// Id of the payment row that settled this part.
    pub payment_id: Option<i32>,
}

/// A charge divided into parts
#[derive(Debug, Clone, Serialize)]
pub struct SplitPlan {
    pub id: String,
    pub session_id: Option<i32>,
    pub total: f64,
    pub parts: Vec<SplitPart>,
}

impl SplitPlan {
    /// Partition `total` into `part_count` even parts.
    pub fn new(session_id: Option<i32>, total: f64, part_count: usize) -> Result<Self, DomainError> {
        if total <= 0.0 {
            return Err(DomainError::Validation(format!(
                "split total must be positive, got {}",
                total
            )));
        }
        if part_count == 0 || part_count > MAX_PARTS {
            return Err(DomainError::Validation(format!(
                "part count must be between 1 and {}, got {}",
                MAX_PARTS, part_count
            )));
        }

        let mut plan = Self {
            id: Uuid::new_v4().to_string(),
            session_id,
            total,
            parts: vec![
                SplitPart {
                    amount: 0.0,
                    paid: false,
                    payment_id: None,
                };
                part_count
            ],
        };
        plan.redistribute();
        Ok(plan)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn paid_count(&self) -> usize {
        self.parts.iter().filter(|p| p.paid).count()
    }

    pub fn paid_total(&self) -> f64 {
        self.parts.iter().filter(|p| p.paid).map(|p| p.amount).sum()
    }

    /// The amount still owed: total minus frozen paid parts.
    pub fn unpaid_total(&self) -> f64 {
        self.total - self.paid_total()
    }

    pub fn is_fully_paid(&self) -> bool {
        self.parts.iter().all(|p| p.paid)
    }

    /// Spread the unpaid remainder evenly over the unpaid parts.
    fn redistribute(&mut self) {
        let unpaid: Vec<usize> = (0..self.parts.len())
            .filter(|&i| !self.parts[i].paid)
            .collect();
        if unpaid.is_empty() {
            return;
        }
        let share = self.unpaid_total() / unpaid.len() as f64;
        for i in unpaid {
            self.parts[i].amount = share;
        }
    }

    /// Resize the plan to `count` parts. Paid parts are kept as-is;
    /// the unpaid parts are re-created and the remainder re-spread.
    pub fn set_part_count(&mut self, count: usize) -> Result<(), DomainError> {
        let paid = self.paid_count();
        if count == 0 || count > MAX_PARTS {
            return Err(DomainError::Validation(format!(
                "part count must be between 1 and {}, got {}",
                MAX_PARTS, count
            )));
        }
        if count <= paid {
            return Err(DomainError::InvalidState(format!(
                "{} parts are already paid, cannot shrink the plan to {}",
                paid, count
            )));
        }

        self.parts.retain(|p| p.paid);
        for _ in 0..(count - paid) {
            self.parts.push(SplitPart {
                amount: 0.0,
                paid: false,
                payment_id: None,
            });
        }
        self.redistribute();
        Ok(())
    }

    /// Remove an unpaid part; its share flows back into the remaining
    /// unpaid parts. The last unpaid part cannot be removed while money
    /// is still owed.
    pub fn remove_part(&mut self, index: usize) -> Result<(), DomainError> {
        let part = self
            .parts
            .get(index)
            .ok_or_else(|| DomainError::not_found("SplitPart", "index", index))?;
        if part.paid {
            return Err(DomainError::InvalidState(format!(
                "part {} is already paid and cannot be removed",
                index
            )));
        }
        let unpaid_parts = self.parts.len() - self.paid_count();
        if unpaid_parts == 1 && self.unpaid_total() > SPLIT_TOLERANCE {
            return Err(DomainError::InvalidState(
                "cannot remove the last unpaid part while a balance is owed".into(),
            ));
        }

        self.parts.remove(index);
        self.redistribute();
        Ok(())
    }

    /// Manually override one unpaid part's amount. Deliberately does
    /// NOT rebalance the others: the operator may be mid-edit, and any
    /// resulting imbalance is caught by [`Self::check_balance`] before
    /// a payment is allowed.
    pub fn set_part_amount(&mut self, index: usize, amount: f64) -> Result<(), DomainError> {
        if amount < 0.0 {
            return Err(DomainError::Validation(format!(
                "part amount must not be negative, got {}",
                amount
            )));
        }
        let part = self
            .parts
            .get_mut(index)
            .ok_or_else(|| DomainError::not_found("SplitPart", "index", index))?;
        if part.paid {
            return Err(DomainError::InvalidState(format!(
                "part {} is already paid and cannot be edited",
                index
            )));
        }
        part.amount = amount;
        Ok(())
    }

    /// All parts (paid + unpaid) must sum to the total within
    /// [`SPLIT_TOLERANCE`] before any part may be paid.
    pub fn check_balance(&self) -> Result<(), DomainError> {
        let actual: f64 = self.parts.iter().map(|p| p.amount).sum();
        if (actual - self.total).abs() > SPLIT_TOLERANCE {
            return Err(DomainError::SplitImbalance {
                expected: self.total,
                actual,
            });
        }
        Ok(())
    }

    /// Freeze a part after its payment row completed.
    pub fn mark_paid(&mut self, index: usize, payment_id: i32) -> Result<(), DomainError> {
        let part = self
            .parts
            .get_mut(index)
            .ok_or_else(|| DomainError::not_found("SplitPart", "index", index))?;
        if part.paid {
            return Err(DomainError::InvalidState(format!(
                "part {} is already paid",
                index
            )));
        }
        part.paid = true;
        part.payment_id = Some(payment_id);
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() <= SPLIT_TOLERANCE, "{} != {}", a, b);
    }

    #[test]
    fn even_split_on_creation() {
        let plan = SplitPlan::new(Some(1), 900.0, 3).unwrap();
        assert_eq!(plan.part_count(), 3);
        for part in &plan.parts {
            assert_close(part.amount, 300.0);
            assert!(!part.paid);
        }
        plan.check_balance().unwrap();
    }

    #[test]
    fn rejects_zero_parts_and_nonpositive_total() {
        assert!(SplitPlan::new(None, 900.0, 0).is_err());
        assert!(SplitPlan::new(None, 0.0, 2).is_err());
        assert!(SplitPlan::new(None, 900.0, MAX_PARTS + 1).is_err());
    }

    #[test]
    fn uneven_total_still_balances() {
        let plan = SplitPlan::new(None, 1000.0, 3).unwrap();
        plan.check_balance().unwrap();
        assert_close(plan.parts.iter().map(|p| p.amount).sum::<f64>(), 1000.0);
    }

    #[test]
    fn paying_a_part_freezes_it() {
        let mut plan = SplitPlan::new(Some(1), 900.0, 3).unwrap();
        plan.mark_paid(1, 42).unwrap();
        assert_eq!(plan.paid_count(), 1);
        assert_close(plan.paid_total(), 300.0);
        assert_close(plan.unpaid_total(), 600.0);
        // The two remaining parts were already even, nothing moved.
        assert_close(plan.parts[0].amount, 300.0);
        assert_close(plan.parts[2].amount, 300.0);
    }

    #[test]
    fn removing_unpaid_part_respreads_remainder_onto_survivors() {
        // 900 in 3 parts, part 1 paid, then part 2 removed: the unpaid
        // 600 all lands on part 0; the paid part stays frozen at 300.
        let mut plan = SplitPlan::new(Some(1), 900.0, 3).unwrap();
        plan.mark_paid(1, 42).unwrap();
        plan.remove_part(2).unwrap();

        assert_eq!(plan.part_count(), 2);
        assert_close(plan.parts[0].amount, 600.0);
        assert!(plan.parts[1].paid);
        assert_close(plan.parts[1].amount, 300.0);
        plan.check_balance().unwrap();
    }

    #[test]
    fn cannot_remove_paid_part() {
        let mut plan = SplitPlan::new(None, 900.0, 3).unwrap();
        plan.mark_paid(0, 7).unwrap();
        assert!(matches!(
            plan.remove_part(0),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn cannot_remove_last_unpaid_part_with_balance_owed() {
        let mut plan = SplitPlan::new(None, 900.0, 2).unwrap();
        plan.mark_paid(0, 7).unwrap();
        assert!(plan.remove_part(1).is_err());
    }

    #[test]
    fn growing_the_plan_respreads_evenly() {
        let mut plan = SplitPlan::new(None, 900.0, 2).unwrap();
        plan.mark_paid(0, 7).unwrap(); // froze 450
        plan.set_part_count(4).unwrap(); // 1 paid + 3 unpaid
        assert_eq!(plan.part_count(), 4);
        assert_close(plan.unpaid_total(), 450.0);
        for part in plan.parts.iter().filter(|p| !p.paid) {
            assert_close(part.amount, 150.0);
        }
        plan.check_balance().unwrap();
    }

    #[test]
    fn cannot_shrink_below_paid_count() {
        let mut plan = SplitPlan::new(None, 900.0, 3).unwrap();
        plan.mark_paid(0, 7).unwrap();
        assert!(plan.set_part_count(1).is_err());
    }

    #[test]
    fn manual_edit_can_unbalance_and_is_detected() {
        let mut plan = SplitPlan::new(None, 900.0, 3).unwrap();
        plan.set_part_amount(0, 100.0).unwrap();
        let err = plan.check_balance().unwrap_err();
        match err {
            DomainError::SplitImbalance { expected, actual } => {
                assert_close(expected, 900.0);
                assert_close(actual, 700.0);
            }
            other => panic!("expected SplitImbalance, got {:?}", other),
        }
    }

    #[test]
    fn balanced_manual_edits_pass() {
        let mut plan = SplitPlan::new(None, 900.0, 2).unwrap();
        plan.set_part_amount(0, 350.0).unwrap();
        plan.set_part_amount(1, 550.0).unwrap();
        plan.check_balance().unwrap();
    }

    #[test]
    fn fully_paid_when_all_parts_settle() {
        let mut plan = SplitPlan::new(None, 600.0, 2).unwrap();
        plan.mark_paid(0, 1).unwrap();
        assert!(!plan.is_fully_paid());
        plan.mark_paid(1, 2).unwrap();
        assert!(plan.is_fully_paid());
    }

    #[test]
    fn double_pay_of_a_part_is_rejected() {
        let mut plan = SplitPlan::new(None, 600.0, 2).unwrap();
        plan.mark_paid(0, 1).unwrap();
        assert!(plan.mark_paid(0, 2).is_err());
    }
}
