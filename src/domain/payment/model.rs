//! Payment domain entity

use chrono::{DateTime, Utc};

/// How a payment was (or will be) tendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Mpesa,
    /// Not yet chosen; the placeholder method on freshly created
    /// pending payments.
    Pending,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::Mpesa => "MPESA",
            Self::Pending => "PENDING",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "CASH" => Some(Self::Cash),
            "MPESA" => Some(Self::Mpesa),
            "PENDING" => Some(Self::Pending),
            _ => None,
        }
    }
}

/// Settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// One charge against a session or an ad-hoc transaction.
///
/// A session may carry several payment rows when its charge is split;
/// the session counts as fully paid once the `Completed` rows sum to
/// its `total_amount`. Completed payments are never revised.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i32,
    pub session_id: Option<i32>,
    pub customer_id: Option<i32>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    /// External reference, e.g. a mobile-money transaction code.
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// A `Pending` payment for a session's derived charge.
    pub fn pending_for_session(session_id: i32, customer_id: Option<i32>, amount: f64) -> Self {
        Self {
            id: 0,
            session_id: Some(session_id),
            customer_id,
            amount,
            method: PaymentMethod::Pending,
            status: PaymentStatus::Pending,
            reference: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// A `Pending` payment not tied to any session.
    pub fn pending_adhoc(customer_id: Option<i32>, amount: f64) -> Self {
        Self {
            session_id: None,
            ..Self::pending_for_session(0, customer_id, amount)
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    /// Mark the payment settled. The caller must have verified it is
    /// still `Pending`.
    pub fn complete(&mut self, method: PaymentMethod, reference: Option<String>) {
        self.method = method;
        self.status = PaymentStatus::Completed;
        if reference.is_some() {
            self.reference = reference;
        }
        self.completed_at = Some(Utc::now());
    }

    pub fn fail(&mut self, reference: Option<String>) {
        self.status = PaymentStatus::Failed;
        if reference.is_some() {
            self.reference = reference;
        }
        self.completed_at = Some(Utc::now());
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_for_session_starts_unsettled() {
        let p = Payment::pending_for_session(5, Some(9), 600.0);
        assert!(p.is_pending());
        assert_eq!(p.method, PaymentMethod::Pending);
        assert_eq!(p.session_id, Some(5));
        assert_eq!(p.amount, 600.0);
        assert!(p.completed_at.is_none());
    }

    #[test]
    fn adhoc_payment_has_no_session() {
        let p = Payment::pending_adhoc(None, 150.0);
        assert!(p.session_id.is_none());
        assert!(p.customer_id.is_none());
    }

    #[test]
    fn complete_sets_method_and_timestamp() {
        let mut p = Payment::pending_for_session(5, None, 600.0);
        p.complete(PaymentMethod::Mpesa, Some("QFX12ABC9".into()));
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.method, PaymentMethod::Mpesa);
        assert_eq!(p.reference.as_deref(), Some("QFX12ABC9"));
        assert!(p.completed_at.is_some());
    }

    #[test]
    fn complete_without_reference_keeps_existing() {
        let mut p = Payment::pending_for_session(5, None, 600.0);
        p.reference = Some("TXN-1".into());
        p.complete(PaymentMethod::Cash, None);
        assert_eq!(p.reference.as_deref(), Some("TXN-1"));
    }

    #[test]
    fn method_and_status_roundtrip() {
        for m in &[PaymentMethod::Cash, PaymentMethod::Mpesa, PaymentMethod::Pending] {
            assert_eq!(PaymentMethod::from_str(m.as_str()), Some(*m));
        }
        for s in &[
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
        ] {
            assert_eq!(PaymentStatus::from_str(s.as_str()), Some(*s));
        }
        assert!(PaymentMethod::from_str("CARD").is_none());
    }
}
