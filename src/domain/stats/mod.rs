//! Daily-stats aggregate: model + repository interface

pub mod model;
pub mod repository;

pub use model::{DailyStat, StatDelta};
pub use repository::DailyStatRepository;
