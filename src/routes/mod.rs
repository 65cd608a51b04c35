use axum::Router;

use crate::state::SharedState;

/// Admin-token protected maintenance routes.
pub mod admin;
/// Generic collection search.
pub mod collection;
/// Swagger UI and the OpenAPI document.
pub mod docs;
/// Game catalog, ratings and deals.
pub mod game;
/// Liveness and store readiness.
pub mod health;
/// Moderation actions, dashboard and text analysis.
pub mod moderation;
/// Recommendation generation and lookup.
pub mod recommendation;
/// Review submission and editing.
pub mod review;
/// Login, logout and current session.
pub mod session;
/// Tag management.
pub mod tag;
/// Account management.
pub mod user;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(user::router())
        .merge(session::router())
        .merge(game::router())
        .merge(review::router())
        .merge(tag::router())
        .merge(recommendation::router())
        .merge(moderation::router())
        .merge(collection::router())
        .merge(admin::router(state.clone()))
        .merge(docs::router());

    api_router.with_state(state)
}
