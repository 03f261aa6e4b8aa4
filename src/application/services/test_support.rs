//! In-memory repository fakes for service-level tests

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::customer::CustomerRepository;
use crate::domain::game::GameRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::session::SessionRepository;
use crate::domain::station::StationRepository;
use crate::domain::stats::DailyStatRepository;
use crate::domain::{
    Customer, DailyStat, DomainError, DomainResult, Game, Payment, PaymentStatus,
    RepositoryProvider, Session, SessionStatus, StatDelta, Station, StationStatus,
};

/// Everything behind plain mutex-held vectors; ids are handed out from
/// per-table counters like the autoincrement columns would.
#[derive(Default)]
pub struct MemoryRepos {
    pub stations: Mutex<Vec<Station>>,
    pub sessions: Mutex<Vec<Session>>,
    pub payments: Mutex<Vec<Payment>>,
    pub customers: Mutex<Vec<Customer>>,
    pub games: Mutex<Vec<Game>>,
    pub stats: Mutex<Vec<DailyStat>>,
    next_station: AtomicI32,
    next_session: AtomicI32,
    next_payment: AtomicI32,
    next_customer: AtomicI32,
    next_game: AtomicI32,
    next_stat: AtomicI32,
}

impl MemoryRepos {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(counter: &AtomicI32) -> i32 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl RepositoryProvider for MemoryRepos {
    fn stations(&self) -> &dyn StationRepository {
        self
    }
    fn sessions(&self) -> &dyn SessionRepository {
        self
    }
    fn payments(&self) -> &dyn PaymentRepository {
        self
    }
    fn customers(&self) -> &dyn CustomerRepository {
        self
    }
    fn games(&self) -> &dyn GameRepository {
        self
    }
    fn daily_stats(&self) -> &dyn DailyStatRepository {
        self
    }
}

#[async_trait]
impl StationRepository for MemoryRepos {
    async fn create(&self, mut station: Station) -> DomainResult<Station> {
        station.id = Self::bump(&self.next_station);
        self.stations.lock().unwrap().push(station.clone());
        Ok(station)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Station>> {
        Ok(self.stations.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Station>> {
        Ok(self.stations.lock().unwrap().clone())
    }

    async fn update(&self, station: Station) -> DomainResult<()> {
        let mut stations = self.stations.lock().unwrap();
        let slot = stations
            .iter_mut()
            .find(|s| s.id == station.id)
            .ok_or_else(|| DomainError::not_found("Station", "id", station.id))?;
        *slot = station;
        Ok(())
    }

    async fn claim_available(&self, id: i32) -> DomainResult<bool> {
        let mut stations = self.stations.lock().unwrap();
        match stations.iter_mut().find(|s| s.id == id) {
            Some(s) if s.status == StationStatus::Available => {
                s.status = StationStatus::Active;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_active(&self, id: i32) -> DomainResult<bool> {
        let mut stations = self.stations.lock().unwrap();
        match stations.iter_mut().find(|s| s.id == id) {
            Some(s) if s.status == StationStatus::Active => {
                s.status = StationStatus::Available;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_status(&self, id: i32, status: StationStatus) -> DomainResult<()> {
        let mut stations = self.stations.lock().unwrap();
        let slot = stations
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| DomainError::not_found("Station", "id", id))?;
        slot.status = status;
        Ok(())
    }
}

#[async_trait]
impl SessionRepository for MemoryRepos {
    async fn create(&self, mut session: Session) -> DomainResult<Session> {
        session.id = Self::bump(&self.next_session);
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Session>> {
        Ok(self.sessions.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, session: Session) -> DomainResult<()> {
        let mut sessions = self.sessions.lock().unwrap();
        let slot = sessions
            .iter_mut()
            .find(|s| s.id == session.id)
            .ok_or_else(|| DomainError::not_found("Session", "id", session.id))?;
        *slot = session;
        Ok(())
    }

    async fn find_active_for_station(&self, station_id: i32) -> DomainResult<Option<Session>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.station_id == station_id && s.status == SessionStatus::Active)
            .cloned())
    }

    async fn find_active(&self) -> DomainResult<Vec<Session>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.status == SessionStatus::Active)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Session>> {
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn find_completed_on(&self, date: NaiveDate) -> DomainResult<Vec<Session>> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.status == SessionStatus::Completed
                    && s.end_time.map(|t| t.date_naive()) == Some(date)
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PaymentRepository for MemoryRepos {
    async fn create(&self, mut payment: Payment) -> DomainResult<Payment> {
        payment.id = Self::bump(&self.next_payment);
        self.payments.lock().unwrap().push(payment.clone());
        Ok(payment)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>> {
        Ok(self.payments.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_session(&self, session_id: i32) -> DomainResult<Vec<Payment>> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.session_id == Some(session_id))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Payment>> {
        Ok(self.payments.lock().unwrap().clone())
    }

    async fn update(&self, payment: Payment) -> DomainResult<()> {
        let mut payments = self.payments.lock().unwrap();
        let slot = payments
            .iter_mut()
            .find(|p| p.id == payment.id)
            .ok_or_else(|| DomainError::not_found("Payment", "id", payment.id))?;
        *slot = payment;
        Ok(())
    }

    async fn completed_total_for_session(&self, session_id: i32) -> DomainResult<f64> {
        Ok(self
            .payments
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.session_id == Some(session_id) && p.status == PaymentStatus::Completed)
            .map(|p| p.amount)
            .sum())
    }
}

#[async_trait]
impl CustomerRepository for MemoryRepos {
    async fn create(&self, mut customer: Customer) -> DomainResult<Customer> {
        customer.id = Self::bump(&self.next_customer);
        self.customers.lock().unwrap().push(customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Customer>> {
        Ok(self.customers.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Customer>> {
        Ok(self.customers.lock().unwrap().clone())
    }

    async fn update(&self, customer: Customer) -> DomainResult<()> {
        let mut customers = self.customers.lock().unwrap();
        let slot = customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or_else(|| DomainError::not_found("Customer", "id", customer.id))?;
        *slot = customer;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let mut customers = self.customers.lock().unwrap();
        let before = customers.len();
        customers.retain(|c| c.id != id);
        if customers.len() == before {
            return Err(DomainError::not_found("Customer", "id", id));
        }
        Ok(())
    }

    async fn add_loyalty_points(&self, id: i32, points: i64) -> DomainResult<()> {
        let mut customers = self.customers.lock().unwrap();
        let slot = customers
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found("Customer", "id", id))?;
        slot.loyalty_points += points;
        Ok(())
    }
}

#[async_trait]
impl GameRepository for MemoryRepos {
    async fn create(&self, mut game: Game) -> DomainResult<Game> {
        game.id = Self::bump(&self.next_game);
        self.games.lock().unwrap().push(game.clone());
        Ok(game)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Game>> {
        Ok(self.games.lock().unwrap().iter().find(|g| g.id == id).cloned())
    }

    async fn find_all(&self) -> DomainResult<Vec<Game>> {
        Ok(self.games.lock().unwrap().clone())
    }

    async fn update(&self, game: Game) -> DomainResult<()> {
        let mut games = self.games.lock().unwrap();
        let slot = games
            .iter_mut()
            .find(|g| g.id == game.id)
            .ok_or_else(|| DomainError::not_found("Game", "id", game.id))?;
        *slot = game;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let mut games = self.games.lock().unwrap();
        let before = games.len();
        games.retain(|g| g.id != id);
        if games.len() == before {
            return Err(DomainError::not_found("Game", "id", id));
        }
        Ok(())
    }
}

#[async_trait]
impl DailyStatRepository for MemoryRepos {
    async fn find_by_date(&self, date: NaiveDate) -> DomainResult<Option<DailyStat>> {
        Ok(self.stats.lock().unwrap().iter().find(|s| s.date == date).cloned())
    }

    async fn get_or_create(&self, date: NaiveDate) -> DomainResult<DailyStat> {
        let mut stats = self.stats.lock().unwrap();
        if let Some(existing) = stats.iter().find(|s| s.date == date) {
            return Ok(existing.clone());
        }
        let mut stat = DailyStat::zeroed(date);
        stat.id = Self::bump(&self.next_stat);
        stats.push(stat.clone());
        Ok(stat)
    }

    async fn adjust(
        &self,
        date: NaiveDate,
        delta: &StatDelta,
        create_missing: bool,
    ) -> DomainResult<()> {
        let mut stats = self.stats.lock().unwrap();
        match stats.iter_mut().find(|s| s.date == date) {
            Some(stat) => stat.apply(delta),
            None if create_missing => {
                let mut stat = DailyStat::zeroed(date);
                stat.id = Self::bump(&self.next_stat);
                stat.apply(delta);
                stats.push(stat);
            }
            None => {}
        }
        Ok(())
    }

    async fn upsert(&self, stat: DailyStat) -> DomainResult<()> {
        let mut stats = self.stats.lock().unwrap();
        match stats.iter_mut().find(|s| s.date == stat.date) {
            Some(slot) => {
                let id = slot.id;
                *slot = stat;
                slot.id = id;
            }
            None => {
                let mut stat = stat;
                stat.id = Self::bump(&self.next_stat);
                stats.push(stat);
            }
        }
        Ok(())
    }

    async fn range(&self, from: NaiveDate, to: NaiveDate) -> DomainResult<Vec<DailyStat>> {
        let mut rows: Vec<DailyStat> = self
            .stats
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.date >= from && s.date <= to)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.date);
        Ok(rows)
    }
}
