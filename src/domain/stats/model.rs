//! Daily aggregate statistics
//!
//! One row per calendar date, adjusted incrementally on session start
//! and end. The counters are a cache: `recompute` in the stats service
//! can rebuild any date from the session table, so a missed increment
//! is a skew, not a loss.

use chrono::NaiveDate;

/// Per-day aggregate counters
#[derive(Debug, Clone)]
pub struct DailyStat {
    pub id: i32,
    pub date: NaiveDate,
    /// Stations currently running a session.
    pub active_stations: i32,
    /// Customers currently in a session.
    pub active_users: i32,
    /// Accumulated played hours of completed sessions.
    pub total_hours: f64,
    /// Accumulated charges of completed sessions.
    pub total_revenue: f64,
    /// Optional JSON breakdown blob (per-station utilization).
    pub station_utilization: Option<String>,
    /// Optional JSON breakdown blob (most played games).
    pub popular_games: Option<String>,
}

impl DailyStat {
    /// A zeroed row for `date`.
    pub fn zeroed(date: NaiveDate) -> Self {
        Self {
            id: 0,
            date,
            active_stations: 0,
            active_users: 0,
            total_hours: 0.0,
            total_revenue: 0.0,
            station_utilization: None,
            popular_games: None,
        }
    }

    /// Apply signed deltas. Occupancy gauges floor at zero; the
    /// accumulators are free-running.
    pub fn apply(&mut self, delta: &StatDelta) {
        self.active_stations = (self.active_stations + delta.stations).max(0);
        self.active_users = (self.active_users + delta.users).max(0);
        self.total_hours += delta.hours;
        self.total_revenue += delta.revenue;
    }
}

/// Signed adjustment applied within one update
#[derive(Debug, Clone, Copy, Default)]
pub struct StatDelta {
    pub stations: i32,
    pub users: i32,
    pub hours: f64,
    pub revenue: f64,
}

impl StatDelta {
    /// Delta for a session start: one more busy station and user.
    pub fn session_started() -> Self {
        Self {
            stations: 1,
            users: 1,
            ..Default::default()
        }
    }

    /// Delta for a session end: occupancy down, hours and revenue up.
    pub fn session_ended(duration_minutes: i32, amount: f64) -> Self {
        Self {
            stations: -1,
            users: -1,
            hours: duration_minutes as f64 / 60.0,
            revenue: amount,
        }
    }

    /// Delta for a cancelled session: occupancy down, nothing billed.
    pub fn session_cancelled() -> Self {
        Self {
            stations: -1,
            users: -1,
            ..Default::default()
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 5).unwrap()
    }

    #[test]
    fn start_then_end_returns_to_zero_and_accumulates() {
        let mut stat = DailyStat::zeroed(today());
        stat.apply(&StatDelta::session_started());
        assert_eq!(stat.active_stations, 1);
        assert_eq!(stat.active_users, 1);

        stat.apply(&StatDelta::session_ended(130, 600.0));
        assert_eq!(stat.active_stations, 0);
        assert_eq!(stat.active_users, 0);
        assert!((stat.total_hours - 130.0 / 60.0).abs() < 1e-9);
        assert_eq!(stat.total_revenue, 600.0);
    }

    #[test]
    fn occupancy_floors_at_zero() {
        let mut stat = DailyStat::zeroed(today());
        stat.apply(&StatDelta::session_ended(60, 200.0));
        assert_eq!(stat.active_stations, 0);
        assert_eq!(stat.active_users, 0);
        // accumulators still move
        assert_eq!(stat.total_revenue, 200.0);
    }

    #[test]
    fn cancelled_session_bills_nothing() {
        let mut stat = DailyStat::zeroed(today());
        stat.apply(&StatDelta::session_started());
        stat.apply(&StatDelta::session_cancelled());
        assert_eq!(stat.active_stations, 0);
        assert_eq!(stat.total_revenue, 0.0);
        assert_eq!(stat.total_hours, 0.0);
    }
}
