//! Customer domain entity

use chrono::{DateTime, Utc};

/// One loyalty point per 100 currency units spent, truncating.
pub const LOYALTY_UNIT: f64 = 100.0;

/// Points earned by a completed payment of `amount`.
pub fn loyalty_points_for(amount: f64) -> i64 {
    if amount <= 0.0 {
        return 0;
    }
    (amount / LOYALTY_UNIT).floor() as i64
}

/// A lounge customer with an accruing loyalty balance.
///
/// `loyalty_points` only ever grows in this core; there is no
/// redemption flow.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub loyalty_points: i64,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(id: i32, name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone: phone.into(),
            email: None,
            loyalty_points: 0,
            created_at: Utc::now(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ninety_nine_earns_nothing() {
        assert_eq!(loyalty_points_for(99.0), 0);
    }

    #[test]
    fn two_fifty_earns_two() {
        assert_eq!(loyalty_points_for(250.0), 2);
    }

    #[test]
    fn exact_multiples() {
        assert_eq!(loyalty_points_for(100.0), 1);
        assert_eq!(loyalty_points_for(600.0), 6);
    }

    #[test]
    fn truncates_never_rounds() {
        assert_eq!(loyalty_points_for(199.99), 1);
    }

    #[test]
    fn nonpositive_amounts_earn_nothing() {
        assert_eq!(loyalty_points_for(0.0), 0);
        assert_eq!(loyalty_points_for(-50.0), 0);
    }

    #[test]
    fn new_customer_starts_with_zero_points() {
        let c = Customer::new(1, "Wanjiku", "+254700000001");
        assert_eq!(c.loyalty_points, 0);
        assert!(c.email.is_none());
    }
}
