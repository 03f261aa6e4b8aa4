//! SeaORM repository implementations

pub mod customer_repository;
pub mod daily_stat_repository;
pub mod game_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod session_repository;
pub mod station_repository;

pub use customer_repository::SeaOrmCustomerRepository;
pub use daily_stat_repository::SeaOrmDailyStatRepository;
pub use game_repository::SeaOrmGameRepository;
pub use payment_repository::SeaOrmPaymentRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
pub use session_repository::SeaOrmSessionRepository;
pub use station_repository::SeaOrmStationRepository;
