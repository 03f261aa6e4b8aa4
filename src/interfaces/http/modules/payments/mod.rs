pub mod dto;
pub mod handlers;

pub use dto::{PaymentDto, PaymentFilter, SplitPlanDto};
pub use handlers::*;
