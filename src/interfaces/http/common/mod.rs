//! Shared HTTP plumbing: response envelope, pagination, validation

pub mod api;
pub mod validated_json;

pub use api::{error_status, fail, ApiResponse, PaginatedResponse, PaginationParams};
pub use validated_json::ValidatedJson;
