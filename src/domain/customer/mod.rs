//! Customer aggregate: model + repository interface

pub mod model;
pub mod repository;

pub use model::{loyalty_points_for, Customer, LOYALTY_UNIT};
pub use repository::CustomerRepository;
