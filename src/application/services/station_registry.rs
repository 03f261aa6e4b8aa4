//! Station registry service
//!
//! Owns station identity, rate cards and status toggles. Session-driven
//! status transitions (`Available <-> Active`) belong to the session
//! ledger; the registry covers operator actions.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::domain::{
    DomainError, DomainResult, RepositoryProvider, Session, Station, StationType,
};
use crate::notifications::{Event, SharedEventBus, StationEvent, StationMaintenanceEvent};
use crate::shared::ActivityLog;

/// Fields accepted when creating a station
#[derive(Debug, Clone)]
pub struct NewStation {
    pub name: String,
    pub station_type: StationType,
    pub rate_per_hour: Option<f64>,
    pub rate_per_game: Option<f64>,
}

/// Operator-editable fields of an existing station
#[derive(Debug, Clone, Default)]
pub struct StationPatch {
    pub name: Option<String>,
    pub station_type: Option<StationType>,
    pub rate_per_hour: Option<Option<f64>>,
    pub rate_per_game: Option<Option<f64>>,
}

/// Service for station operations
pub struct StationRegistry {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: SharedEventBus,
    activity: Arc<ActivityLog>,
}

impl StationRegistry {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        event_bus: SharedEventBus,
        activity: Arc<ActivityLog>,
    ) -> Self {
        Self {
            repos,
            event_bus,
            activity,
        }
    }

    /// Register a new station; it starts `Available`.
    pub async fn create(&self, spec: NewStation) -> DomainResult<Station> {
        if spec.name.trim().is_empty() {
            return Err(DomainError::Validation("station name is required".into()));
        }

        let mut station = Station::new(0, spec.name.trim(), spec.station_type);
        station.rate_per_hour = spec.rate_per_hour;
        station.rate_per_game = spec.rate_per_game;

        let station = self.repos.stations().create(station).await?;
        info!(
            "Station {} registered: {} ({})",
            station.id, station.name, station.station_type
        );
        self.activity
            .record("station", format!("station {} created", station.name));
        self.event_bus
            .publish(Event::StationCreated(self.station_event(&station)));
        Ok(station)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Station> {
        self.repos
            .stations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Station", "id", id))
    }

    pub async fn list(&self) -> DomainResult<Vec<Station>> {
        self.repos.stations().find_all().await
    }

    /// Apply operator edits (name, type, rate card).
    pub async fn update(&self, id: i32, patch: StationPatch) -> DomainResult<Station> {
        let mut station = self.get(id).await?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("station name is required".into()));
            }
            station.name = name.trim().to_string();
        }
        if let Some(ty) = patch.station_type {
            station.station_type = ty;
        }
        if let Some(rate) = patch.rate_per_hour {
            station.rate_per_hour = rate;
        }
        if let Some(rate) = patch.rate_per_game {
            station.rate_per_game = rate;
        }
        station.updated_at = Utc::now();

        self.repos.stations().update(station.clone()).await?;
        self.event_bus
            .publish(Event::StationUpdated(self.station_event(&station)));
        Ok(station)
    }

    /// Take a station out of service, whatever its current state. An
    /// active session keeps running and still bills on end; flagging
    /// the overlap is the operator's call.
    pub async fn set_maintenance(
        &self,
        id: i32,
        reason: impl Into<String>,
        eta: Option<DateTime<Utc>>,
    ) -> DomainResult<Station> {
        let mut station = self.get(id).await?;

        if let Some(session) = self.active_session(id).await? {
            warn!(
                "Station {} sent to maintenance with session {} still active",
                id, session.id
            );
        }

        station.set_maintenance(reason, eta);
        self.repos.stations().update(station.clone()).await?;

        info!(
            "Station {} under maintenance: {}",
            station.id,
            station.maintenance_reason.as_deref().unwrap_or("-")
        );
        self.activity
            .record("station", format!("station {} under maintenance", station.name));
        self.event_bus
            .publish(Event::StationMaintenance(StationMaintenanceEvent {
                station_id: station.id,
                name: station.name.clone(),
                reason: station.maintenance_reason.clone(),
                eta: station.maintenance_eta,
                timestamp: Utc::now(),
            }));
        Ok(station)
    }

    /// Put a maintained station back in rotation.
    pub async fn clear_maintenance(&self, id: i32) -> DomainResult<Station> {
        let mut station = self.get(id).await?;
        station.clear_maintenance();
        self.repos.stations().update(station.clone()).await?;

        info!("Station {} back in service", station.id);
        self.activity
            .record("station", format!("station {} back in service", station.name));
        self.event_bus
            .publish(Event::StationUpdated(self.station_event(&station)));
        Ok(station)
    }

    /// The single `Active` session on the station, or `None`.
    pub async fn active_session(&self, station_id: i32) -> DomainResult<Option<Session>> {
        self.repos
            .sessions()
            .find_active_for_station(station_id)
            .await
    }

    fn station_event(&self, station: &Station) -> StationEvent {
        StationEvent {
            station_id: station.id,
            name: station.name.clone(),
            status: station.status.as_str().to_string(),
            timestamp: Utc::now(),
        }
    }
}
