//! Game aggregate: model + repository interface

pub mod model;
pub mod repository;

pub use model::Game;
pub use repository::GameRepository;
