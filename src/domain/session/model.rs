//! Play session domain entity
//!
//! A session is one customer's occupancy of a station from start to
//! end. The charge is derived at close time: flat per-game price for
//! `Fixed` sessions, ceiling-of-elapsed-hours times the hourly rate for
//! `Hourly` ones. `end_time`, `duration_minutes` and `total_amount` are
//! written exactly once, at the moment of closing.

use chrono::{DateTime, Utc};

/// Billing mode of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    /// Billed per started hour against the station's hourly rate
    Hourly,
    /// Flat price for one game, independent of elapsed time
    Fixed,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "HOURLY",
            Self::Fixed => "FIXED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HOURLY" => Some(Self::Hourly),
            "FIXED" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Session lifecycle status
///
/// `Active -> Completed` on normal close, `Active -> Cancelled` when an
/// operator aborts without billing. Terminal states are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// One customer's occupancy of a station with a derived charge
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i32,
    pub station_id: i32,
    pub customer_id: i32,
    pub game_id: Option<i32>,
    pub session_type: SessionType,
    /// Rate snapshot taken at start (hourly rate or flat game price),
    /// so later rate-card edits never change a running session's bill.
    pub rate: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Elapsed minutes, floored. Set once at close.
    pub duration_minutes: Option<i32>,
    pub status: SessionStatus,
    /// Derived charge. Set once at close.
    pub total_amount: Option<f64>,
    pub planned_minutes: Option<i32>,
}

impl Session {
    pub fn new(
        station_id: i32,
        customer_id: i32,
        game_id: Option<i32>,
        session_type: SessionType,
        rate: f64,
        planned_minutes: Option<i32>,
    ) -> Self {
        Self {
            id: 0,
            station_id,
            customer_id,
            game_id,
            session_type,
            rate,
            start_time: Utc::now(),
            end_time: None,
            duration_minutes: None,
            status: SessionStatus::Active,
            total_amount: None,
            planned_minutes,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Elapsed whole minutes from start to `now` (floor).
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_time).num_minutes().max(0)
    }

    /// Whole hours billed for an hourly session: elapsed wall-clock
    /// time rounded up to the next hour, so 61 minutes bills as 2 hours
    /// and any started hour counts in full.
    pub fn billable_hours(&self, now: DateTime<Utc>) -> i64 {
        let secs = (now - self.start_time).num_seconds().max(0);
        (secs + 3599) / 3600
    }

    /// Charge due if the session were closed at `now`.
    pub fn charge_at(&self, now: DateTime<Utc>) -> f64 {
        match self.session_type {
            SessionType::Fixed => self.rate,
            SessionType::Hourly => self.billable_hours(now) as f64 * self.rate,
        }
    }

    /// Close the session at `now`: fixes `end_time`, `duration_minutes`
    /// and `total_amount`, and moves to `Completed`. The caller must
    /// have verified the session is `Active`.
    pub fn close(&mut self, now: DateTime<Utc>) {
        self.total_amount = Some(self.charge_at(now));
        self.duration_minutes = Some(self.elapsed_minutes(now) as i32);
        self.end_time = Some(now);
        self.status = SessionStatus::Completed;
    }

    /// Abort without billing: `end_time` is recorded, no charge derived.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.duration_minutes = Some(self.elapsed_minutes(now) as i32);
        self.end_time = Some(now);
        self.status = SessionStatus::Cancelled;
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn hourly_session(rate: f64) -> Session {
        Session::new(1, 10, None, SessionType::Hourly, rate, None)
    }

    fn fixed_session(rate: f64) -> Session {
        Session::new(1, 10, Some(3), SessionType::Fixed, rate, None)
    }

    #[test]
    fn new_session_is_active_and_unbilled() {
        let s = hourly_session(200.0);
        assert!(s.is_active());
        assert!(s.end_time.is_none());
        assert!(s.total_amount.is_none());
        assert!(s.duration_minutes.is_none());
    }

    #[test]
    fn sixty_minutes_bills_one_hour() {
        let s = hourly_session(200.0);
        let now = s.start_time + Duration::minutes(60);
        assert_eq!(s.billable_hours(now), 1);
        assert_eq!(s.charge_at(now), 200.0);
    }

    #[test]
    fn sixty_one_minutes_bills_two_hours() {
        let s = hourly_session(200.0);
        let now = s.start_time + Duration::minutes(61);
        assert_eq!(s.billable_hours(now), 2);
        assert_eq!(s.charge_at(now), 400.0);
    }

    #[test]
    fn sub_hour_session_bills_one_full_hour() {
        let s = hourly_session(200.0);
        let now = s.start_time + Duration::minutes(7);
        assert_eq!(s.billable_hours(now), 1);
        assert_eq!(s.charge_at(now), 200.0);
    }

    #[test]
    fn fixed_charge_ignores_elapsed_time() {
        let s = fixed_session(40.0);
        let short = s.start_time + Duration::minutes(5);
        let long = s.start_time + Duration::hours(6);
        assert_eq!(s.charge_at(short), 40.0);
        assert_eq!(s.charge_at(long), 40.0);
    }

    #[test]
    fn close_at_130_minutes_bills_three_hour_ceiling() {
        let mut s = hourly_session(200.0);
        let now = s.start_time + Duration::minutes(130);
        s.close(now);
        assert_eq!(s.status, SessionStatus::Completed);
        assert_eq!(s.duration_minutes, Some(130));
        assert_eq!(s.total_amount, Some(600.0));
        assert_eq!(s.end_time, Some(now));
    }

    #[test]
    fn duration_is_floored_to_whole_minutes() {
        let s = hourly_session(200.0);
        let now = s.start_time + Duration::seconds(149);
        assert_eq!(s.elapsed_minutes(now), 2);
    }

    #[test]
    fn cancel_records_no_charge() {
        let mut s = hourly_session(200.0);
        let now = s.start_time + Duration::minutes(45);
        s.cancel(now);
        assert_eq!(s.status, SessionStatus::Cancelled);
        assert!(s.total_amount.is_none());
        assert_eq!(s.duration_minutes, Some(45));
    }

    #[test]
    fn session_type_roundtrip() {
        for ty in &[SessionType::Hourly, SessionType::Fixed] {
            assert_eq!(SessionType::from_str(ty.as_str()), Some(*ty));
        }
        assert!(SessionType::from_str("WEEKLY").is_none());
    }

    #[test]
    fn session_status_roundtrip() {
        for st in &[
            SessionStatus::Active,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(SessionStatus::from_str(st.as_str()), Some(*st));
        }
        assert!(SessionStatus::from_str("PAUSED").is_none());
    }
}
