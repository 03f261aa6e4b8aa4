//! Database migrations module
//!
//! The schema is versioned and explicit; a mismatch between entities
//! and tables fails fast at startup instead of degrading queries.

pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_stations;
mod m20250301_000002_create_customers;
mod m20250301_000003_create_games;
mod m20250301_000004_create_sessions;
mod m20250301_000005_create_payments;
mod m20250301_000006_create_daily_stats;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_stations::Migration),
            Box::new(m20250301_000002_create_customers::Migration),
            Box::new(m20250301_000003_create_games::Migration),
            Box::new(m20250301_000004_create_sessions::Migration),
            Box::new(m20250301_000005_create_payments::Migration),
            Box::new(m20250301_000006_create_daily_stats::Migration),
        ]
    }
}
