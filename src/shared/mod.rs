pub mod activity_log;
pub mod errors;
pub mod shutdown;

pub use activity_log::{ActivityEntry, ActivityLog};
pub use errors::{AppError, DomainError, InfraError};
pub use shutdown::{listen_for_shutdown_signals, ShutdownSignal};
