use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{delete, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        collection::PurgeResponse,
        user::{RoleRequest, UserResponse},
    },
    error::AppError,
    services::{collection_service, user_service},
    state::SharedState,
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Destructive maintenance endpoints guarded by the configured admin token.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/collections", delete(purge_all))
        .route("/admin/collections/{name}", delete(purge_collection))
        .route("/admin/users/{id}/role", put(assign_role))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

/// Delete every document of one collection.
#[utoipa::path(
    delete,
    path = "/admin/collections/{name}",
    tag = "admin",
    params(
        ("name" = String, Path, description = "Collection name"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token")
    ),
    responses(
        (status = 200, description = "Collection emptied", body = PurgeResponse),
        (status = 401, description = "Missing or wrong admin token"),
        (status = 404, description = "Unknown collection")
    )
)]
pub async fn purge_collection(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<PurgeResponse>, AppError> {
    Ok(Json(collection_service::purge(&state, Some(&name)).await?))
}

/// Delete every document of every collection.
#[utoipa::path(
    delete,
    path = "/admin/collections",
    tag = "admin",
    params(("X-Admin-Token" = String, Header, description = "Configured admin token")),
    responses(
        (status = 200, description = "All collections emptied", body = PurgeResponse),
        (status = 401, description = "Missing or wrong admin token")
    )
)]
pub async fn purge_all(State(state): State<SharedState>) -> Result<Json<PurgeResponse>, AppError> {
    Ok(Json(collection_service::purge(&state, None).await?))
}

/// Grant a role (member, moderator, admin) to an account.
#[utoipa::path(
    put,
    path = "/admin/users/{id}/role",
    tag = "admin",
    params(
        ("id" = Uuid, Path, description = "User identifier"),
        ("X-Admin-Token" = String, Header, description = "Configured admin token")
    ),
    request_body = RoleRequest,
    responses(
        (status = 200, description = "Role updated", body = UserResponse),
        (status = 401, description = "Missing or wrong admin token"),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn assign_role(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleRequest>,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(user_service::assign_role(&state, id, payload).await?))
}

async fn require_admin_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
        .ok_or_else(|| {
            AppError::Unauthorized("missing admin token header `X-Admin-Token`".into())
        })?;

    match state.config().admin_token.as_deref() {
        Some(token) if token == provided => Ok(next.run(req).await),
        Some(_) => Err(AppError::Unauthorized("invalid admin token".into())),
        None => Err(AppError::Unauthorized(
            "admin routes are disabled (no ADMIN_TOKEN configured)".into(),
        )),
    }
}
