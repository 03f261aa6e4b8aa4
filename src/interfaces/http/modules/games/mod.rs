pub mod dto;
pub mod handlers;

pub use dto::{CreateGameRequest, GameDto, UpdateGameRequest};
pub use handlers::*;
