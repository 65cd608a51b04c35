use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::recommendation::RecommendationResponse,
    error::AppError,
    routes::session::CurrentSession,
    services::recommendation_service,
    state::SharedState,
};

/// Recommendation routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/recommendations", post(generate))
        .route("/recommendations/latest", get(latest))
}

/// Score the catalog for the session's user and store the top ten.
#[utoipa::path(
    post,
    path = "/recommendations",
    tag = "recommendations",
    params(("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")),
    responses((status = 201, description = "Stored recommendation", body = RecommendationResponse))
)]
pub async fn generate(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> Result<(StatusCode, Json<RecommendationResponse>), AppError> {
    let recommendation = recommendation_service::generate(&state, &session).await?;
    Ok((StatusCode::CREATED, Json(recommendation)))
}

/// Most recent snapshot of the session's user.
#[utoipa::path(
    get,
    path = "/recommendations/latest",
    tag = "recommendations",
    params(("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")),
    responses(
        (status = 200, description = "Newest stored recommendation", body = RecommendationResponse),
        (status = 404, description = "None generated yet")
    )
)]
pub async fn latest(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<RecommendationResponse>, AppError> {
    Ok(Json(
        recommendation_service::latest_for_user(&state, &session).await?,
    ))
}
