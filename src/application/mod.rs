//! Business logic: services and outbound ports

pub mod ports;
pub mod services;

pub use ports::{MobileMoneyProvider, SimulatedMobileMoney};
pub use services::{
    DailyStatsService, PaymentReconciler, PollConfig, SessionLedger, StationRegistry,
};
