//! Common API DTOs and error mapping

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::errors::DomainError;

/// Standard API response wrapper
///
/// Every REST endpoint returns data inside this envelope. On success:
/// `{"success": true, "data": {...}}`; on failure:
/// `{"success": false, "error": "reason"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` if the request succeeded
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Map a domain failure to the HTTP status a caller can act on. The
/// kinds differ in retry strategy, so collapsing them would lose
/// information the UI needs.
pub fn error_status(err: &DomainError) -> StatusCode {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidState(_) => StatusCode::CONFLICT,
        DomainError::SplitImbalance { .. } => StatusCode::CONFLICT,
        DomainError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The standard error arm for handlers: status from the error kind,
/// body carrying the human-readable reason.
pub fn fail<T>(err: DomainError) -> (StatusCode, axum::Json<ApiResponse<T>>) {
    (
        error_status(&err),
        axum::Json(ApiResponse::error(err.to_string())),
    )
}

/// Pagination parameters for list requests
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PaginationParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1-100). Default: 50
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    50
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

/// Paginated response with page metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let total_pages = ((total as f64) / (limit as f64)).ceil() as u32;
        Self {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }

    /// Slice a full result set down to one page.
    pub fn paginate(all: Vec<T>, params: &PaginationParams) -> Self {
        let total = all.len() as u64;
        let start = ((params.page.max(1) - 1) * params.limit) as usize;
        let items: Vec<T> = all
            .into_iter()
            .skip(start)
            .take(params.limit as usize)
            .collect();
        Self::new(items, total, params.page, params.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_slices_and_counts() {
        let params = PaginationParams { page: 2, limit: 3 };
        let page = PaginatedResponse::paginate((1..=8).collect::<Vec<_>>(), &params);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.total, 8);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn statuses_distinguish_error_kinds() {
        assert_eq!(
            error_status(&DomainError::not_found("Station", "id", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_status(&DomainError::InvalidState("busy".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            error_status(&DomainError::Validation("bad".into())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_status(&DomainError::ExternalService("down".into())),
            StatusCode::BAD_GATEWAY
        );
    }
}
