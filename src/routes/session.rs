use axum::{
    Json, Router,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::user::{LoginRequest, SessionResponse, UserResponse},
    error::AppError,
    services::user_service,
    state::{Session, SharedState},
};

const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Extracts the caller's [`Session`] from the `X-Session-Token` header.
pub struct CurrentSession(pub Session);

impl FromRequestParts<SharedState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("missing session header `X-Session-Token`".into())
            })?;

        state
            .session(token)
            .map(CurrentSession)
            .ok_or_else(|| AppError::Unauthorized("unknown or expired session".into()))
    }
}

/// Login, logout and "who am I".
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/sessions", post(login).delete(logout))
        .route("/sessions/me", get(me))
}

/// Open a session for an existing user.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "sessions",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = SessionResponse),
        (status = 404, description = "Unknown username")
    )
)]
pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload.validate()?;
    Ok(Json(user_service::login(&state, &payload.username).await?))
}

/// Close the caller's session.
#[utoipa::path(
    delete,
    path = "/sessions",
    tag = "sessions",
    params(("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")),
    responses((status = 204, description = "Session closed"))
)]
pub async fn logout(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> StatusCode {
    user_service::logout(&state, &session);
    StatusCode::NO_CONTENT
}

/// Profile of the session's user.
#[utoipa::path(
    get,
    path = "/sessions/me",
    tag = "sessions",
    params(("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "No valid session")
    )
)]
pub async fn me(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(user_service::current_user(&state, &session).await?))
}
