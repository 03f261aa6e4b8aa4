//! Application services

pub mod daily_stats;
pub mod payment_reconciler;
pub mod session_ledger;
pub mod station_registry;

#[cfg(test)]
pub mod test_support;

pub use daily_stats::DailyStatsService;
pub use payment_reconciler::{
    ConfirmOutcome, MpesaCheckout, PaymentReconciler, PollConfig, QrCheckout,
};
pub use session_ledger::{SessionLedger, StartSession};
pub use station_registry::{NewStation, StationPatch, StationRegistry};
