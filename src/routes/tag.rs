use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::tag::{CreateTagRequest, TagRefreshResponse, TagResponse},
    error::AppError,
    services::tag_service,
    state::SharedState,
};

/// Tag routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route("/tags/refresh", post(refresh_tags))
        .route("/tags/{id}", delete(delete_tag))
}

/// Create a tag with a unique name.
#[utoipa::path(
    post,
    path = "/tags",
    tag = "tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 409, description = "Tag name already used")
    )
)]
pub async fn create_tag(
    State(state): State<SharedState>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>), AppError> {
    payload.validate()?;
    let tag = tag_service::create_tag(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Every tag, by name.
#[utoipa::path(
    get,
    path = "/tags",
    tag = "tags",
    responses((status = 200, description = "Tags by name", body = [TagResponse]))
)]
pub async fn list_tags(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    Ok(Json(tag_service::list_tags(&state).await?))
}

/// Delete a tag.
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "tags",
    params(("id" = Uuid, Path, description = "Tag identifier")),
    responses((status = 204, description = "Tag deleted"))
)]
pub async fn delete_tag(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    tag_service::delete_tag(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Recount games per tag. Failures are logged, not returned.
#[utoipa::path(
    post,
    path = "/tags/refresh",
    tag = "tags",
    responses((status = 200, description = "Refresh outcome", body = TagRefreshResponse))
)]
pub async fn refresh_tags(State(state): State<SharedState>) -> Json<TagRefreshResponse> {
    Json(tag_service::refresh_game_counts(&state).await)
}
