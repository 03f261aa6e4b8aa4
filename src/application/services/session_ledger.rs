//! Session ledger service
//!
//! Sole writer of session status, time and amount fields. Drives the
//! station `Available <-> Active` transitions, derives the charge at
//! close, opens the pending payment, and keeps the daily counters in
//! step with both ends of the lifecycle.

use std::sync::Arc;

use chrono::Utc;
use log::info;

use super::daily_stats::DailyStatsService;
use crate::domain::{
    DomainError, DomainResult, Payment, RepositoryProvider, Session, SessionType, StatDelta,
    DEFAULT_GAME_RATE,
};
use crate::notifications::{
    Event, PaymentEvent, SessionEndedEvent, SessionEvent, SharedEventBus,
};
use crate::shared::ActivityLog;

/// Parameters for starting a session
#[derive(Debug, Clone)]
pub struct StartSession {
    pub station_id: i32,
    pub customer_id: i32,
    pub game_id: Option<i32>,
    pub session_type: SessionType,
    pub planned_minutes: Option<i32>,
}

/// Service for the session lifecycle
pub struct SessionLedger {
    repos: Arc<dyn RepositoryProvider>,
    stats: Arc<DailyStatsService>,
    event_bus: SharedEventBus,
    activity: Arc<ActivityLog>,
}

impl SessionLedger {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        stats: Arc<DailyStatsService>,
        event_bus: SharedEventBus,
        activity: Arc<ActivityLog>,
    ) -> Self {
        Self {
            repos,
            stats,
            event_bus,
            activity,
        }
    }

    /// Start a session on an `Available` station.
    ///
    /// The `Available -> Active` flip is one atomic conditional update,
    /// so two concurrent starts cannot both win the station.
    pub async fn start(&self, req: StartSession) -> DomainResult<Session> {
        let station = self
            .repos
            .stations()
            .find_by_id(req.station_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Station", "id", req.station_id))?;

        let customer = self
            .repos
            .customers()
            .find_by_id(req.customer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Customer", "id", req.customer_id))?;

        let game = match req.game_id {
            Some(game_id) => Some(
                self.repos
                    .games()
                    .find_by_id(game_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Game", "id", game_id))?,
            ),
            None => None,
        };

        // Rate snapshot: fixed sessions prefer the game's price, then the
        // station's per-game rate, then the fallback; hourly sessions use
        // the station's hourly rate or its fallback.
        let rate = match req.session_type {
            SessionType::Fixed => game
                .as_ref()
                .and_then(|g| g.price_per_session)
                .or(station.rate_per_game)
                .unwrap_or(DEFAULT_GAME_RATE),
            SessionType::Hourly => station.hourly_rate(),
        };

        if !self.repos.stations().claim_available(station.id).await? {
            return Err(DomainError::InvalidState(format!(
                "station {} is not available (status: {})",
                station.id, station.status
            )));
        }

        let session = Session::new(
            station.id,
            customer.id,
            game.as_ref().map(|g| g.id),
            req.session_type,
            rate,
            req.planned_minutes,
        );
        let session = match self.repos.sessions().create(session).await {
            Ok(s) => s,
            Err(e) => {
                // Give the claimed station back; the insert never happened.
                let _ = self.repos.stations().release_active(station.id).await;
                return Err(e);
            }
        };

        self.stats
            .adjust(session.start_time.date_naive(), &StatDelta::session_started(), true)
            .await?;

        metrics::counter!("pos_sessions_started_total").increment(1);
        info!(
            "Session {} started: station={}, customer={}, type={}, rate={}",
            session.id,
            station.id,
            customer.id,
            session.session_type.as_str(),
            rate
        );
        self.activity.record(
            "session",
            format!("session {} started on {}", session.id, station.name),
        );
        self.event_bus.publish(Event::SessionCreated(SessionEvent {
            session_id: session.id,
            station_id: session.station_id,
            customer_id: session.customer_id,
            session_type: session.session_type.as_str().to_string(),
            timestamp: Utc::now(),
        }));

        Ok(session)
    }

    /// End an active session: derive the charge, free the station, open
    /// a pending payment and update today's counters.
    pub async fn end(&self, session_id: i32) -> DomainResult<(Session, Payment)> {
        let mut session = self
            .repos
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", "id", session_id))?;

        if !session.is_active() {
            return Err(DomainError::InvalidState(format!(
                "session {} is not active (status: {})",
                session_id,
                session.status.as_str()
            )));
        }

        let now = Utc::now();
        session.close(now);
        self.repos.sessions().update(session.clone()).await?;

        self.repos.stations().release_active(session.station_id).await?;

        let total = session.total_amount.unwrap_or(0.0);
        let duration = session.duration_minutes.unwrap_or(0);

        let payment = self
            .repos
            .payments()
            .create(Payment::pending_for_session(
                session.id,
                Some(session.customer_id),
                total,
            ))
            .await?;
        self.event_bus.publish(Event::PaymentCreated(PaymentEvent {
            payment_id: payment.id,
            session_id: payment.session_id,
            station_id: Some(session.station_id),
            amount: payment.amount,
            method: payment.method.as_str().to_string(),
            status: payment.status.as_str().to_string(),
            timestamp: Utc::now(),
        }));

        // No row for today (day rollover) makes this a no-op.
        self.stats
            .adjust(
                now.date_naive(),
                &StatDelta::session_ended(duration, total),
                false,
            )
            .await?;

        metrics::counter!("pos_sessions_completed_total").increment(1);
        info!(
            "Session {} ended: duration={}min, total={}",
            session.id, duration, total
        );
        self.activity.record(
            "session",
            format!(
                "session {} ended after {} min, {} due",
                session.id, duration, total
            ),
        );
        self.event_bus.publish(Event::SessionEnded(SessionEndedEvent {
            session_id: session.id,
            station_id: session.station_id,
            customer_id: session.customer_id,
            status: session.status.as_str().to_string(),
            duration_minutes: duration,
            total_amount: total,
            timestamp: now,
        }));

        Ok((session, payment))
    }

    /// Abort an active session without billing. Reserved transition:
    /// frees the station and rolls the occupancy gauges back.
    pub async fn cancel(&self, session_id: i32) -> DomainResult<Session> {
        let mut session = self
            .repos
            .sessions()
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", "id", session_id))?;

        if !session.is_active() {
            return Err(DomainError::InvalidState(format!(
                "session {} is not active (status: {})",
                session_id,
                session.status.as_str()
            )));
        }

        let now = Utc::now();
        session.cancel(now);
        self.repos.sessions().update(session.clone()).await?;
        self.repos.stations().release_active(session.station_id).await?;

        self.stats
            .adjust(now.date_naive(), &StatDelta::session_cancelled(), false)
            .await?;

        info!("Session {} cancelled", session.id);
        self.activity
            .record("session", format!("session {} cancelled", session.id));
        self.event_bus.publish(Event::SessionEnded(SessionEndedEvent {
            session_id: session.id,
            station_id: session.station_id,
            customer_id: session.customer_id,
            status: session.status.as_str().to_string(),
            duration_minutes: session.duration_minutes.unwrap_or(0),
            total_amount: 0.0,
            timestamp: now,
        }));

        Ok(session)
    }

    pub async fn get(&self, id: i32) -> DomainResult<Session> {
        self.repos
            .sessions()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Session", "id", id))
    }

    pub async fn list(&self) -> DomainResult<Vec<Session>> {
        self.repos.sessions().find_all().await
    }

    pub async fn active(&self) -> DomainResult<Vec<Session>> {
        self.repos.sessions().find_active().await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Duration;

    use super::super::test_support::MemoryRepos;
    use super::*;
    use crate::domain::{Customer, Game, SessionStatus, Station, StationStatus, StationType};
    use crate::notifications::create_event_bus;
    use crate::shared::ActivityLog;

    struct Fixture {
        repos: Arc<MemoryRepos>,
        ledger: SessionLedger,
    }

    fn fixture() -> Fixture {
        let repos = Arc::new(MemoryRepos::new());
        let provider_repos: Arc<dyn RepositoryProvider> = repos.clone();
        let stats = Arc::new(DailyStatsService::new(provider_repos.clone()));
        let ledger = SessionLedger::new(
            provider_repos,
            stats,
            create_event_bus(),
            Arc::new(ActivityLog::new()),
        );
        Fixture { repos, ledger }
    }

    async fn seed_station(fx: &Fixture, rate_per_hour: Option<f64>) -> Station {
        let mut station = Station::new(0, "PC-01", StationType::Pc);
        station.rate_per_hour = rate_per_hour;
        fx.repos.stations().create(station).await.unwrap()
    }

    async fn seed_customer(fx: &Fixture) -> Customer {
        fx.repos
            .customers()
            .create(Customer::new(0, "Wanjiku", "+254700000001"))
            .await
            .unwrap()
    }

    fn start_req(station_id: i32, customer_id: i32) -> StartSession {
        StartSession {
            station_id,
            customer_id,
            game_id: None,
            session_type: SessionType::Hourly,
            planned_minutes: None,
        }
    }

    fn rewind_start(fx: &Fixture, session_id: i32, minutes: i64) {
        let mut sessions = fx.repos.sessions.lock().unwrap();
        let session = sessions.iter_mut().find(|s| s.id == session_id).unwrap();
        session.start_time -= Duration::minutes(minutes);
    }

    #[tokio::test]
    async fn start_claims_station_and_bumps_counters() {
        let fx = fixture();
        let station = seed_station(&fx, Some(200.0)).await;
        let customer = seed_customer(&fx).await;

        let session = fx.ledger.start(start_req(station.id, customer.id)).await.unwrap();
        assert!(session.is_active());
        assert_eq!(session.rate, 200.0);

        let station = fx.repos.stations().find_by_id(station.id).await.unwrap().unwrap();
        assert_eq!(station.status, StationStatus::Active);

        let stats = fx.repos.stats.lock().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].active_stations, 1);
        assert_eq!(stats[0].active_users, 1);
    }

    #[tokio::test]
    async fn start_on_busy_station_fails_without_mutation() {
        let fx = fixture();
        let station = seed_station(&fx, None).await;
        let customer = seed_customer(&fx).await;
        fx.repos
            .stations()
            .set_status(station.id, StationStatus::Active)
            .await
            .unwrap();

        let err = fx.ledger.start(start_req(station.id, customer.id)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert!(fx.repos.sessions.lock().unwrap().is_empty());
        assert!(fx.repos.stats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn start_on_unknown_station_or_customer_fails() {
        let fx = fixture();
        let customer = seed_customer(&fx).await;
        let err = fx.ledger.start(start_req(99, customer.id)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let station = seed_station(&fx, None).await;
        let err = fx.ledger.start(start_req(station.id, 99)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn hourly_rate_defaults_when_unconfigured() {
        let fx = fixture();
        let station = seed_station(&fx, None).await;
        let customer = seed_customer(&fx).await;
        let session = fx.ledger.start(start_req(station.id, customer.id)).await.unwrap();
        assert_eq!(session.rate, 200.0);
    }

    #[tokio::test]
    async fn fixed_session_prefers_game_price() {
        let fx = fixture();
        let station = seed_station(&fx, None).await;
        let customer = seed_customer(&fx).await;
        let mut game = Game::new(0, "FIFA 25");
        game.price_per_session = Some(55.0);
        let game = fx.repos.games().create(game).await.unwrap();

        let session = fx
            .ledger
            .start(StartSession {
                station_id: station.id,
                customer_id: customer.id,
                game_id: Some(game.id),
                session_type: SessionType::Fixed,
                planned_minutes: None,
            })
            .await
            .unwrap();
        assert_eq!(session.rate, 55.0);
    }

    #[tokio::test]
    async fn fixed_session_falls_back_to_default_rate() {
        let fx = fixture();
        let station = seed_station(&fx, None).await;
        let customer = seed_customer(&fx).await;

        let session = fx
            .ledger
            .start(StartSession {
                station_id: station.id,
                customer_id: customer.id,
                game_id: None,
                session_type: SessionType::Fixed,
                planned_minutes: None,
            })
            .await
            .unwrap();
        assert_eq!(session.rate, DEFAULT_GAME_RATE);
    }

    #[tokio::test]
    async fn end_at_130_minutes_bills_three_hours() {
        let fx = fixture();
        let station = seed_station(&fx, Some(200.0)).await;
        let customer = seed_customer(&fx).await;
        let session = fx.ledger.start(start_req(station.id, customer.id)).await.unwrap();
        rewind_start(&fx, session.id, 130);

        let (session, payment) = fx.ledger.end(session.id).await.unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.duration_minutes, Some(130));
        assert_eq!(session.total_amount, Some(600.0));

        assert!(payment.is_pending());
        assert_eq!(payment.amount, 600.0);
        assert_eq!(payment.session_id, Some(session.id));

        let station = fx.repos.stations().find_by_id(station.id).await.unwrap().unwrap();
        assert_eq!(station.status, StationStatus::Available);

        let stats = fx.repos.stats.lock().unwrap();
        assert_eq!(stats[0].active_stations, 0);
        assert_eq!(stats[0].active_users, 0);
        assert_eq!(stats[0].total_revenue, 600.0);
        assert!((stats[0].total_hours - 130.0 / 60.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn end_non_active_session_fails() {
        let fx = fixture();
        let station = seed_station(&fx, None).await;
        let customer = seed_customer(&fx).await;
        let session = fx.ledger.start(start_req(station.id, customer.id)).await.unwrap();
        fx.ledger.end(session.id).await.unwrap();

        let err = fx.ledger.end(session.id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[tokio::test]
    async fn end_after_day_rollover_skips_decrement() {
        let fx = fixture();
        let station = seed_station(&fx, Some(200.0)).await;
        let customer = seed_customer(&fx).await;
        let session = fx.ledger.start(start_req(station.id, customer.id)).await.unwrap();

        // Simulate the rollover: today's row vanished before the end.
        fx.repos.stats.lock().unwrap().clear();

        let (session, _payment) = fx.ledger.end(session.id).await.unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert!(fx.repos.stats.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cancel_frees_station_without_billing() {
        let fx = fixture();
        let station = seed_station(&fx, Some(200.0)).await;
        let customer = seed_customer(&fx).await;
        let session = fx.ledger.start(start_req(station.id, customer.id)).await.unwrap();

        let session = fx.ledger.cancel(session.id).await.unwrap();
        assert_eq!(session.status, SessionStatus::Cancelled);
        assert!(session.total_amount.is_none());

        let station = fx.repos.stations().find_by_id(station.id).await.unwrap().unwrap();
        assert_eq!(station.status, StationStatus::Available);
        assert!(fx.repos.payments.lock().unwrap().is_empty());

        let stats = fx.repos.stats.lock().unwrap();
        assert_eq!(stats[0].active_stations, 0);
        assert_eq!(stats[0].total_revenue, 0.0);
    }
}
