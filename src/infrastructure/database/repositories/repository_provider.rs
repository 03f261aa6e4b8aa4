//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::customer::CustomerRepository;
use crate::domain::game::GameRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::repositories::RepositoryProvider;
use crate::domain::session::SessionRepository;
use crate::domain::station::StationRepository;
use crate::domain::stats::DailyStatRepository;

use super::customer_repository::SeaOrmCustomerRepository;
use super::daily_stat_repository::SeaOrmDailyStatRepository;
use super::game_repository::SeaOrmGameRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::session_repository::SeaOrmSessionRepository;
use super::station_repository::SeaOrmStationRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository
/// accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let station = repos.stations().find_by_id(1).await?;
/// let session = repos.sessions().find_active_for_station(1).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    stations: SeaOrmStationRepository,
    sessions: SeaOrmSessionRepository,
    payments: SeaOrmPaymentRepository,
    customers: SeaOrmCustomerRepository,
    games: SeaOrmGameRepository,
    daily_stats: SeaOrmDailyStatRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            stations: SeaOrmStationRepository::new(db.clone()),
            sessions: SeaOrmSessionRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            customers: SeaOrmCustomerRepository::new(db.clone()),
            games: SeaOrmGameRepository::new(db.clone()),
            daily_stats: SeaOrmDailyStatRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn stations(&self) -> &dyn StationRepository {
        &self.stations
    }

    fn sessions(&self) -> &dyn SessionRepository {
        &self.sessions
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn customers(&self) -> &dyn CustomerRepository {
        &self.customers
    }

    fn games(&self) -> &dyn GameRepository {
        &self.games
    }

    fn daily_stats(&self) -> &dyn DailyStatRepository {
        &self.daily_stats
    }
}
