//! Gaming station domain entity

use chrono::{DateTime, Utc};

/// Fallback hourly rate when a station has none configured.
pub const DEFAULT_HOURLY_RATE: f64 = 200.0;
/// Fallback per-game rate when neither station nor game has one.
pub const DEFAULT_GAME_RATE: f64 = 40.0;

/// Hardware category of a station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationType {
    Pc,
    Playstation,
    Xbox,
    Vr,
    Simulator,
}

impl StationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pc => "PC",
            Self::Playstation => "PLAYSTATION",
            Self::Xbox => "XBOX",
            Self::Vr => "VR",
            Self::Simulator => "SIMULATOR",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PC" => Some(Self::Pc),
            "PLAYSTATION" => Some(Self::Playstation),
            "XBOX" => Some(Self::Xbox),
            "VR" => Some(Self::Vr),
            "SIMULATOR" => Some(Self::Simulator),
            _ => None,
        }
    }
}

impl std::fmt::Display for StationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Station occupancy status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStatus {
    /// Free for a new session
    Available,
    /// A session is running on this station
    Active,
    /// Taken out of service by an operator
    Maintenance,
}

impl StationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Active => "ACTIVE",
            Self::Maintenance => "MAINTENANCE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(Self::Available),
            "ACTIVE" => Some(Self::Active),
            "MAINTENANCE" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for StationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical gaming rig, rentable by the hour or per game.
///
/// Invariant: `status == Active` iff exactly one session with status
/// `Active` references this station. Stations are never hard-deleted.
#[derive(Debug, Clone)]
pub struct Station {
    pub id: i32,
    pub name: String,
    pub station_type: StationType,
    pub status: StationStatus,
    /// Rate card; `None` falls back to [`DEFAULT_HOURLY_RATE`].
    pub rate_per_hour: Option<f64>,
    /// Rate card; `None` falls back to [`DEFAULT_GAME_RATE`].
    pub rate_per_game: Option<f64>,
    pub maintenance_reason: Option<String>,
    pub maintenance_eta: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Station {
    pub fn new(id: i32, name: impl Into<String>, station_type: StationType) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            station_type,
            status: StationStatus::Available,
            rate_per_hour: None,
            rate_per_game: None,
            maintenance_reason: None,
            maintenance_eta: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Effective hourly rate (configured or fallback).
    pub fn hourly_rate(&self) -> f64 {
        self.rate_per_hour.unwrap_or(DEFAULT_HOURLY_RATE)
    }

    /// Effective per-game rate (configured or fallback).
    pub fn game_rate(&self) -> f64 {
        self.rate_per_game.unwrap_or(DEFAULT_GAME_RATE)
    }

    pub fn is_available(&self) -> bool {
        self.status == StationStatus::Available
    }

    pub fn set_maintenance(&mut self, reason: impl Into<String>, eta: Option<DateTime<Utc>>) {
        self.status = StationStatus::Maintenance;
        self.maintenance_reason = Some(reason.into());
        self.maintenance_eta = eta;
        self.updated_at = Utc::now();
    }

    pub fn clear_maintenance(&mut self) {
        self.status = StationStatus::Available;
        self.maintenance_reason = None;
        self.maintenance_eta = None;
        self.updated_at = Utc::now();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_station() -> Station {
        Station::new(1, "PC-01", StationType::Pc)
    }

    #[test]
    fn new_station_is_available() {
        let s = sample_station();
        assert!(s.is_available());
        assert_eq!(s.status, StationStatus::Available);
        assert!(s.maintenance_reason.is_none());
    }

    #[test]
    fn hourly_rate_falls_back_to_default() {
        let mut s = sample_station();
        assert_eq!(s.hourly_rate(), DEFAULT_HOURLY_RATE);
        s.rate_per_hour = Some(350.0);
        assert_eq!(s.hourly_rate(), 350.0);
    }

    #[test]
    fn game_rate_falls_back_to_default() {
        let mut s = sample_station();
        assert_eq!(s.game_rate(), DEFAULT_GAME_RATE);
        s.rate_per_game = Some(60.0);
        assert_eq!(s.game_rate(), 60.0);
    }

    #[test]
    fn set_maintenance_records_reason_and_eta() {
        let mut s = sample_station();
        let eta = Utc::now() + chrono::Duration::hours(4);
        s.set_maintenance("GPU fan replacement", Some(eta));
        assert_eq!(s.status, StationStatus::Maintenance);
        assert_eq!(s.maintenance_reason.as_deref(), Some("GPU fan replacement"));
        assert_eq!(s.maintenance_eta, Some(eta));
    }

    #[test]
    fn clear_maintenance_restores_availability() {
        let mut s = sample_station();
        s.set_maintenance("controller drift", None);
        s.clear_maintenance();
        assert!(s.is_available());
        assert!(s.maintenance_reason.is_none());
        assert!(s.maintenance_eta.is_none());
    }

    #[test]
    fn station_type_roundtrip() {
        for ty in &[
            StationType::Pc,
            StationType::Playstation,
            StationType::Xbox,
            StationType::Vr,
            StationType::Simulator,
        ] {
            assert_eq!(StationType::from_str(ty.as_str()), Some(*ty));
        }
        assert!(StationType::from_str("ARCADE").is_none());
    }

    #[test]
    fn station_status_roundtrip() {
        for st in &[
            StationStatus::Available,
            StationStatus::Active,
            StationStatus::Maintenance,
        ] {
            assert_eq!(StationStatus::from_str(st.as_str()), Some(*st));
        }
        assert!(StationStatus::from_str("BROKEN").is_none());
    }
}
