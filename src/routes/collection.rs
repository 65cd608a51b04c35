use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::models::Document,
    dto::collection::SearchParams,
    error::AppError,
    services::collection_service,
    state::SharedState,
};

/// Raw stored document: `id`, `createdAt`, `updatedAt` and the collection's fields.
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct DocumentBody(pub Document);

/// Generic search route.
pub fn router() -> Router<SharedState> {
    Router::new().route("/collections/{name}/search", get(search_collection))
}

/// Case-insensitive substring search over any collection.
#[utoipa::path(
    get,
    path = "/collections/{name}/search",
    tag = "collections",
    params(
        ("name" = String, Path, description = "Collection name, e.g. `games` or `moderationLogs`"),
        SearchParams
    ),
    responses(
        (status = 200, description = "Matching documents, oldest first", body = [DocumentBody]),
        (status = 400, description = "A field is not part of the collection"),
        (status = 404, description = "Unknown collection")
    )
)]
pub async fn search_collection(
    State(state): State<SharedState>,
    Path(name): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<DocumentBody>>, AppError> {
    let fields = params.field_list();
    let documents = collection_service::search(&state, &name, &params.term, &fields).await?;
    Ok(Json(documents.into_iter().map(DocumentBody).collect()))
}
