use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::deals::DealRecord,
    dto::{
        game::{
            CreateGameRequest, DealsParams, GameListQuery, GameResponse, RatingSummary,
            UpdateGameRequest,
        },
        review::ReviewResponse,
    },
    error::AppError,
    services::{game_service, review_service},
    state::SharedState,
};

/// Catalog, deals and per-game review routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route("/games/import/{external_id}", post(import_game))
        .route(
            "/games/{id}",
            get(get_game).put(update_game).delete(delete_game),
        )
        .route("/games/{id}/rating", get(game_rating))
        .route("/games/{id}/reviews", get(game_reviews))
        .route("/deals", get(list_deals))
}

/// Add a game to the catalog.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game created", body = GameResponse),
        (status = 409, description = "Title already in the catalog")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Json(payload): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    payload.validate()?;
    let game = game_service::create_game(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// List the catalog, optionally filtered by `search`.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(GameListQuery),
    responses((status = 200, description = "Games sorted by title", body = [GameResponse]))
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Query(query): Query<GameListQuery>,
) -> Result<Json<Vec<GameResponse>>, AppError> {
    let games = game_service::list_games(&state, query.search.as_deref()).await?;
    Ok(Json(games))
}

/// Create a catalog entry from a deals-API game.
#[utoipa::path(
    post,
    path = "/games/import/{external_id}",
    tag = "games",
    params(("external_id" = String, Path, description = "Game id in the deals API")),
    responses(
        (status = 201, description = "Game imported", body = GameResponse),
        (status = 404, description = "Unknown deals-API game"),
        (status = 409, description = "Title already in the catalog"),
        (status = 502, description = "Deals API failed")
    )
)]
pub async fn import_game(
    State(state): State<SharedState>,
    Path(external_id): Path<String>,
) -> Result<(StatusCode, Json<GameResponse>), AppError> {
    let game = game_service::import_from_deals(&state, &external_id).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// One catalog entry.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Game", body = GameResponse),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn get_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GameResponse>, AppError> {
    Ok(Json(game_service::get_game(&state, id).await?))
}

/// Partially update a catalog entry.
#[utoipa::path(
    put,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    request_body = UpdateGameRequest,
    responses(
        (status = 200, description = "Updated game", body = GameResponse),
        (status = 409, description = "Title already in the catalog")
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGameRequest>,
) -> Result<Json<GameResponse>, AppError> {
    payload.validate()?;
    Ok(Json(game_service::update_game(&state, id, payload).await?))
}

/// Delete a game. Its reviews are kept.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses((status = 204, description = "Game deleted"))
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::delete_game(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Average rating and count of approved reviews.
#[utoipa::path(
    get,
    path = "/games/{id}/rating",
    tag = "games",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Rating summary", body = RatingSummary),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn game_rating(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RatingSummary>, AppError> {
    Ok(Json(review_service::rating_summary(&state, id).await?))
}

/// Approved reviews of a game, newest first.
#[utoipa::path(
    get,
    path = "/games/{id}/reviews",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Game identifier")),
    responses(
        (status = 200, description = "Visible reviews", body = [ReviewResponse]),
        (status = 404, description = "Unknown game")
    )
)]
pub async fn game_reviews(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, AppError> {
    Ok(Json(review_service::list_for_game(&state, id).await?))
}

/// Current deals from the external deals API.
#[utoipa::path(
    get,
    path = "/deals",
    tag = "games",
    params(DealsParams),
    responses(
        (status = 200, description = "Deals", body = [DealRecord]),
        (status = 502, description = "Deals API failed")
    )
)]
pub async fn list_deals(
    State(state): State<SharedState>,
    Query(params): Query<DealsParams>,
) -> Result<Json<Vec<DealRecord>>, AppError> {
    Ok(Json(game_service::list_deals(&state, params).await?))
}
