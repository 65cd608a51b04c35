use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::review::{CreateReviewRequest, ReviewWriteResponse, UpdateReviewRequest},
    error::AppError,
    routes::session::CurrentSession,
    services::review_service,
    state::SharedState,
};

/// Review authoring routes; all require a session.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/reviews", post(create_review))
        .route("/reviews/{id}", put(update_review).delete(delete_review))
}

/// Review a game as the session's user.
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    params(("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review stored; rating refreshed", body = ReviewWriteResponse),
        (status = 400, description = "Rating outside 1..=5"),
        (status = 404, description = "Unknown game"),
        (status = 409, description = "Game already reviewed by this user")
    )
)]
pub async fn create_review(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewWriteResponse>), AppError> {
    payload.validate()?;
    let outcome = review_service::create_review(&state, &session, payload).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Edit one of your reviews.
#[utoipa::path(
    put,
    path = "/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = Uuid, Path, description = "Review identifier"),
        ("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")
    ),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated; rating refreshed", body = ReviewWriteResponse),
        (status = 401, description = "Not the author")
    )
)]
pub async fn update_review(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReviewRequest>,
) -> Result<Json<ReviewWriteResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        review_service::update_review(&state, &session, id, payload).await?,
    ))
}

/// Delete one of your reviews.
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    params(
        ("id" = Uuid, Path, description = "Review identifier"),
        ("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")
    ),
    responses(
        (status = 200, description = "Review deleted; rating refreshed", body = ReviewWriteResponse),
        (status = 401, description = "Not the author")
    )
)]
pub async fn delete_review(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewWriteResponse>, AppError> {
    Ok(Json(
        review_service::delete_review(&state, &session, id).await?,
    ))
}
