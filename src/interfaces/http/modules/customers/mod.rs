pub mod dto;
pub mod handlers;

pub use dto::{CreateCustomerRequest, CustomerDto, UpdateCustomerRequest};
pub use handlers::*;
