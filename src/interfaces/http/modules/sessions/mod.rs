pub mod dto;
pub mod handlers;

pub use dto::{SessionDto, SessionFilter, StartSessionRequest};
pub use handlers::*;
