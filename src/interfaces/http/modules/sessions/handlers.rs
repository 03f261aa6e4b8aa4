//! Session API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{parse_session_type, SessionDto, SessionFilter, StartSessionRequest};
use crate::application::services::{SessionLedger, StartSession};
use crate::interfaces::http::common::{
    fail, ApiResponse, PaginatedResponse, PaginationParams, ValidatedJson,
};
use crate::interfaces::http::modules::payments::PaymentDto;

/// Session handler state
#[derive(Clone)]
pub struct SessionAppState {
    pub ledger: Arc<SessionLedger>,
}

/// Session end result: the closed session and its pending payment.
#[derive(Debug, serde::Serialize, utoipa::ToSchema)]
pub struct SessionEndDto {
    pub session: SessionDto,
    pub payment: PaymentDto,
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "Sessions",
    request_body = StartSessionRequest,
    responses(
        (status = 201, description = "Session started", body = ApiResponse<SessionDto>),
        (status = 404, description = "Station or customer not found"),
        (status = 409, description = "Station not available")
    )
)]
pub async fn start_session(
    State(state): State<SessionAppState>,
    ValidatedJson(body): ValidatedJson<StartSessionRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<SessionDto>>),
    (StatusCode, Json<ApiResponse<SessionDto>>),
> {
    let session_type = parse_session_type(&body.session_type).map_err(fail)?;
    let req = StartSession {
        station_id: body.station_id,
        customer_id: body.customer_id,
        game_id: body.game_id,
        session_type,
        planned_minutes: body.planned_minutes,
    };
    match state.ledger.start(req).await {
        Ok(session) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(SessionDto::from_domain(session))),
        )),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/end",
    tag = "Sessions",
    params(("id" = i32, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session ended, pending payment created", body = ApiResponse<SessionEndDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Session not active")
    )
)]
pub async fn end_session(
    State(state): State<SessionAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SessionEndDto>>, (StatusCode, Json<ApiResponse<SessionEndDto>>)> {
    match state.ledger.end(id).await {
        Ok((session, payment)) => Ok(Json(ApiResponse::success(SessionEndDto {
            session: SessionDto::from_domain(session),
            payment: PaymentDto::from_domain(payment),
        }))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/cancel",
    tag = "Sessions",
    params(("id" = i32, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session cancelled without billing", body = ApiResponse<SessionDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Session not active")
    )
)]
pub async fn cancel_session(
    State(state): State<SessionAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SessionDto>>, (StatusCode, Json<ApiResponse<SessionDto>>)> {
    match state.ledger.cancel(id).await {
        Ok(session) => Ok(Json(ApiResponse::success(SessionDto::from_domain(session)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    params(("id" = i32, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session details", body = ApiResponse<SessionDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_session(
    State(state): State<SessionAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SessionDto>>, (StatusCode, Json<ApiResponse<SessionDto>>)> {
    match state.ledger.get(id).await {
        Ok(session) => Ok(Json(ApiResponse::success(SessionDto::from_domain(session)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    params(SessionFilter, PaginationParams),
    responses(
        (status = 200, description = "Session list", body = PaginatedResponse<SessionDto>)
    )
)]
pub async fn list_sessions(
    State(state): State<SessionAppState>,
    Query(filter): Query<SessionFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedResponse<SessionDto>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.ledger.list().await {
        Ok(sessions) => {
            let filtered: Vec<SessionDto> = sessions
                .into_iter()
                .filter(|s| {
                    if let Some(station_id) = filter.station_id {
                        if s.station_id != station_id {
                            return false;
                        }
                    }
                    if let Some(customer_id) = filter.customer_id {
                        if s.customer_id != customer_id {
                            return false;
                        }
                    }
                    if let Some(ref status) = filter.status {
                        if !status.eq_ignore_ascii_case(s.status.as_str()) {
                            return false;
                        }
                    }
                    true
                })
                .map(SessionDto::from_domain)
                .collect();
            Ok(Json(PaginatedResponse::paginate(filtered, &pagination)))
        }
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/active",
    tag = "Sessions",
    responses(
        (status = 200, description = "Active sessions", body = ApiResponse<Vec<SessionDto>>)
    )
)]
pub async fn get_active_sessions(
    State(state): State<SessionAppState>,
) -> Result<Json<ApiResponse<Vec<SessionDto>>>, (StatusCode, Json<ApiResponse<Vec<SessionDto>>>)> {
    match state.ledger.active().await {
        Ok(sessions) => Ok(Json(ApiResponse::success(
            sessions.into_iter().map(SessionDto::from_domain).collect(),
        ))),
        Err(e) => Err(fail(e)),
    }
}
