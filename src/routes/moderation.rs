use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::moderation::{
        AnalyzeRequest, AnalyzeResponse, ModerationDashboard, ModerationOutcome,
        ModerationRequest,
    },
    error::AppError,
    routes::session::CurrentSession,
    services::moderation_service,
    state::{SharedState, moderation::ModerationEvent},
};

/// Moderation actions, dashboard and text analysis.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/moderation/reviews/{id}/{event}", post(moderate_review))
        .route("/moderation/dashboard", get(dashboard))
        .route("/moderation/analyze", post(analyze))
}

/// Flag, approve or reject a review.
///
/// Flagging is open to any session; approve and reject need a moderator or admin.
#[utoipa::path(
    post,
    path = "/moderation/reviews/{id}/{event}",
    tag = "moderation",
    params(
        ("id" = Uuid, Path, description = "Review identifier"),
        ("event" = ModerationEvent, Path, description = "flag, approve or reject"),
        ("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")
    ),
    request_body = ModerationRequest,
    responses(
        (status = 200, description = "Review moved to its new status", body = ModerationOutcome),
        (status = 401, description = "Moderator role required"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn moderate_review(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
    Path((id, event)): Path<(Uuid, ModerationEvent)>,
    payload: Option<Json<ModerationRequest>>,
) -> Result<Json<ModerationOutcome>, AppError> {
    let request = payload.map(|Json(request)| request).unwrap_or_default();
    request.validate()?;
    let outcome =
        moderation_service::moderate_review(&state, &session, id, event, request.reason).await?;
    Ok(Json(outcome))
}

/// Status counts, pending queue and recent audit entries; moderators and admins only.
#[utoipa::path(
    get,
    path = "/moderation/dashboard",
    tag = "moderation",
    params(("X-Session-Token" = String, Header, description = "Token returned by POST /sessions")),
    responses(
        (status = 200, description = "Moderation overview", body = ModerationDashboard),
        (status = 401, description = "Moderator role required")
    )
)]
pub async fn dashboard(
    State(state): State<SharedState>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ModerationDashboard>, AppError> {
    Ok(Json(moderation_service::dashboard(&state, &session).await?))
}

/// Run sentiment and spam heuristics on a text without storing anything.
#[utoipa::path(
    post,
    path = "/moderation/analyze",
    tag = "moderation",
    request_body = AnalyzeRequest,
    responses((status = 200, description = "Heuristic results", body = AnalyzeResponse))
)]
pub async fn analyze(Json(payload): Json<AnalyzeRequest>) -> Result<Json<AnalyzeResponse>, AppError> {
    payload.validate()?;
    Ok(Json(moderation_service::analyze(&payload.text)))
}
