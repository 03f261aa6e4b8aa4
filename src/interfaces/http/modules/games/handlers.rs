//! Game catalog API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::dto::{CreateGameRequest, GameDto, UpdateGameRequest};
use crate::domain::{DomainError, Game, RepositoryProvider};
use crate::interfaces::http::common::{fail, ApiResponse, ValidatedJson};
use crate::notifications::{Event, GameEvent, SharedEventBus};

/// Game handler state
#[derive(Clone)]
pub struct GameAppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub event_bus: SharedEventBus,
}

fn game_event(g: &Game) -> GameEvent {
    GameEvent {
        game_id: g.id,
        title: g.title.clone(),
        timestamp: Utc::now(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/games",
    tag = "Games",
    responses(
        (status = 200, description = "Game catalog", body = ApiResponse<Vec<GameDto>>)
    )
)]
pub async fn list_games(
    State(state): State<GameAppState>,
) -> Result<Json<ApiResponse<Vec<GameDto>>>, (StatusCode, Json<ApiResponse<Vec<GameDto>>>)> {
    match state.repos.games().find_all().await {
        Ok(games) => Ok(Json(ApiResponse::success(
            games.into_iter().map(GameDto::from_domain).collect(),
        ))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/games/{id}",
    tag = "Games",
    params(("id" = i32, Path, description = "Game ID")),
    responses(
        (status = 200, description = "Game details", body = ApiResponse<GameDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_game(
    State(state): State<GameAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GameDto>>, (StatusCode, Json<ApiResponse<GameDto>>)> {
    match state.repos.games().find_by_id(id).await {
        Ok(Some(game)) => Ok(Json(ApiResponse::success(GameDto::from_domain(game)))),
        Ok(None) => Err(fail(DomainError::not_found("Game", "id", id))),
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/games",
    tag = "Games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game added to catalog", body = ApiResponse<GameDto>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_game(
    State(state): State<GameAppState>,
    ValidatedJson(body): ValidatedJson<CreateGameRequest>,
) -> Result<(StatusCode, Json<ApiResponse<GameDto>>), (StatusCode, Json<ApiResponse<GameDto>>)> {
    let mut game = Game::new(0, body.title);
    game.genre = body.genre;
    game.price_per_session = body.price_per_session;

    match state.repos.games().create(game).await {
        Ok(game) => {
            info!("Game {} added: {}", game.id, game.title);
            state.event_bus.publish(Event::GameCreated(game_event(&game)));
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success(GameDto::from_domain(game))),
            ))
        }
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/games/{id}",
    tag = "Games",
    params(("id" = i32, Path, description = "Game ID")),
    request_body = UpdateGameRequest,
    responses(
        (status = 200, description = "Game updated", body = ApiResponse<GameDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_game(
    State(state): State<GameAppState>,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateGameRequest>,
) -> Result<Json<ApiResponse<GameDto>>, (StatusCode, Json<ApiResponse<GameDto>>)> {
    let mut game = match state.repos.games().find_by_id(id).await {
        Ok(Some(g)) => g,
        Ok(None) => return Err(fail(DomainError::not_found("Game", "id", id))),
        Err(e) => return Err(fail(e)),
    };

    if let Some(title) = body.title {
        game.title = title;
    }
    if body.genre.is_some() {
        game.genre = body.genre;
    }
    if body.price_per_session.is_some() {
        game.price_per_session = body.price_per_session;
    }

    match state.repos.games().update(game.clone()).await {
        Ok(()) => {
            state.event_bus.publish(Event::GameUpdated(game_event(&game)));
            Ok(Json(ApiResponse::success(GameDto::from_domain(game))))
        }
        Err(e) => Err(fail(e)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/games/{id}",
    tag = "Games",
    params(("id" = i32, Path, description = "Game ID")),
    responses(
        (status = 200, description = "Game removed", body = ApiResponse<GameDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_game(
    State(state): State<GameAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GameDto>>, (StatusCode, Json<ApiResponse<GameDto>>)> {
    let game = match state.repos.games().find_by_id(id).await {
        Ok(Some(g)) => g,
        Ok(None) => return Err(fail(DomainError::not_found("Game", "id", id))),
        Err(e) => return Err(fail(e)),
    };

    match state.repos.games().delete(id).await {
        Ok(()) => {
            info!("Game {} removed", id);
            state.event_bus.publish(Event::GameDeleted(game_event(&game)));
            Ok(Json(ApiResponse::success(GameDto::from_domain(game))))
        }
        Err(e) => Err(fail(e)),
    }
}
