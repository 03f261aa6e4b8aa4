//! Station API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    parse_station_type, CreateStationRequest, MaintenanceRequest, StationDto,
    UpdateStationRequest,
};
use crate::application::services::{NewStation, StationPatch, StationRegistry};
use crate::interfaces::http::common::{fail, ApiResponse, ValidatedJson};
use crate::interfaces::http::modules::sessions::SessionDto;

/// Station handler state
#[derive(Clone)]
pub struct StationAppState {
    pub registry: Arc<StationRegistry>,
}

#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    responses(
        (status = 200, description = "Station list", body = ApiResponse<Vec<StationDto>>)
    )
)]
pub async fn list_stations(
    State(state): State<StationAppState>,
) -> Result<Json<ApiResponse<Vec<StationDto>>>, (StatusCode, Json<ApiResponse<Vec<StationDto>>>)> {
    match state.registry.list().await {
        Ok(stations) => Ok(Json(ApiResponse::success(
            stations.into_iter().map(StationDto::from_domain).collect(),
        ))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_station(
    State(state): State<StationAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<StationDto>>)> {
    match state.registry.get(id).await {
        Ok(station) => Ok(Json(ApiResponse::success(StationDto::from_domain(station)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    request_body = CreateStationRequest,
    responses(
        (status = 201, description = "Station created", body = ApiResponse<StationDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_station(
    State(state): State<StationAppState>,
    ValidatedJson(body): ValidatedJson<CreateStationRequest>,
) -> Result<
    (StatusCode, Json<ApiResponse<StationDto>>),
    (StatusCode, Json<ApiResponse<StationDto>>),
> {
    let station_type = parse_station_type(&body.station_type).map_err(fail)?;
    let spec = NewStation {
        name: body.name,
        station_type,
        rate_per_hour: body.rate_per_hour,
        rate_per_game: body.rate_per_game,
    };
    match state.registry.create(spec).await {
        Ok(station) => Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(StationDto::from_domain(station))),
        )),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    request_body = UpdateStationRequest,
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_station(
    State(state): State<StationAppState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateStationRequest>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<StationDto>>)> {
    let station_type = match body.station_type.as_deref() {
        Some(s) => Some(parse_station_type(s).map_err(fail)?),
        None => None,
    };
    let patch = StationPatch {
        name: body.name,
        station_type,
        rate_per_hour: body.rate_per_hour.map(Some),
        rate_per_game: body.rate_per_game.map(Some),
    };
    match state.registry.update(id, patch).await {
        Ok(station) => Ok(Json(ApiResponse::success(StationDto::from_domain(station)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/stations/{id}/maintenance",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    request_body = MaintenanceRequest,
    responses(
        (status = 200, description = "Station under maintenance", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn set_maintenance(
    State(state): State<StationAppState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<MaintenanceRequest>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<StationDto>>)> {
    match state.registry.set_maintenance(id, body.reason, body.eta).await {
        Ok(station) => Ok(Json(ApiResponse::success(StationDto::from_domain(station)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/stations/{id}/maintenance",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station back in service", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn clear_maintenance(
    State(state): State<StationAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<StationDto>>, (StatusCode, Json<ApiResponse<StationDto>>)> {
    match state.registry.clear_maintenance(id).await {
        Ok(station) => Ok(Json(ApiResponse::success(StationDto::from_domain(station)))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}/active-session",
    tag = "Stations",
    params(("id" = i32, Path, description = "Station ID")),
    responses(
        (status = 200, description = "The station's active session, or null", body = ApiResponse<Option<SessionDto>>)
    )
)]
pub async fn get_active_session(
    State(state): State<StationAppState>,
    Path(id): Path<i32>,
) -> Result<
    Json<ApiResponse<Option<SessionDto>>>,
    (StatusCode, Json<ApiResponse<Option<SessionDto>>>),
> {
    match state.registry.active_session(id).await {
        Ok(session) => Ok(Json(ApiResponse::success(
            session.map(SessionDto::from_domain),
        ))),
        Err(e) => Err(fail(e)),
    }
}
