//! Payment aggregate: model, split plans, repository interface

pub mod model;
pub mod repository;
pub mod split;

pub use model::{Payment, PaymentMethod, PaymentStatus};
pub use repository::PaymentRepository;
pub use split::{SplitPart, SplitPlan, MAX_PARTS, SPLIT_TOLERANCE};
