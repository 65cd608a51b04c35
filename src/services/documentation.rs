use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for GameHub Local.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::user::create_user,
        crate::routes::user::list_users,
        crate::routes::user::get_user,
        crate::routes::user::update_user,
        crate::routes::user::delete_user,
        crate::routes::session::login,
        crate::routes::session::logout,
        crate::routes::session::me,
        crate::routes::game::create_game,
        crate::routes::game::list_games,
        crate::routes::game::import_game,
        crate::routes::game::get_game,
        crate::routes::game::update_game,
        crate::routes::game::delete_game,
        crate::routes::game::game_rating,
        crate::routes::game::game_reviews,
        crate::routes::game::list_deals,
        crate::routes::review::create_review,
        crate::routes::review::update_review,
        crate::routes::review::delete_review,
        crate::routes::tag::create_tag,
        crate::routes::tag::list_tags,
        crate::routes::tag::delete_tag,
        crate::routes::tag::refresh_tags,
        crate::routes::recommendation::generate,
        crate::routes::recommendation::latest,
        crate::routes::moderation::moderate_review,
        crate::routes::moderation::dashboard,
        crate::routes::moderation::analyze,
        crate::routes::collection::search_collection,
        crate::routes::admin::purge_collection,
        crate::routes::admin::purge_all,
        crate::routes::admin::assign_role,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::user::CreateUserRequest,
            crate::dto::user::UpdateUserRequest,
            crate::dto::user::UserResponse,
            crate::dto::user::LoginRequest,
            crate::dto::user::SessionResponse,
            crate::dto::user::RoleRequest,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::UpdateGameRequest,
            crate::dto::game::GameResponse,
            crate::dto::game::RatingSummary,
            crate::dto::review::CreateReviewRequest,
            crate::dto::review::UpdateReviewRequest,
            crate::dto::review::ReviewResponse,
            crate::dto::review::ReviewWriteResponse,
            crate::dto::tag::CreateTagRequest,
            crate::dto::tag::TagResponse,
            crate::dto::tag::TagRefreshResponse,
            crate::dto::recommendation::RecommendationResponse,
            crate::dto::moderation::ModerationRequest,
            crate::dto::moderation::ModerationLogResponse,
            crate::dto::moderation::ModerationOutcome,
            crate::dto::moderation::ModerationDashboard,
            crate::dto::moderation::StatusCounts,
            crate::dto::moderation::AnalyzeRequest,
            crate::dto::moderation::AnalyzeResponse,
            crate::dto::collection::PurgeResponse,
            crate::routes::collection::DocumentBody,
            crate::dao::deals::DealRecord,
            crate::dao::entities::ScoredGame,
            crate::dao::entities::UserRole,
            crate::dao::entities::ModerationAction,
            crate::dao::entities::ModerationTarget,
            crate::dao::schema::Collection,
            crate::state::moderation::ModerationStatus,
            crate::state::moderation::ModerationEvent,
            crate::services::content_analysis::Sentiment,
            crate::services::content_analysis::SentimentLabel,
            crate::services::content_analysis::SpamAssessment,
            crate::services::content_analysis::SpamSignal,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Accounts"),
        (name = "sessions", description = "Login and current user"),
        (name = "games", description = "Catalog, ratings and deals"),
        (name = "reviews", description = "User reviews"),
        (name = "tags", description = "Catalog tags"),
        (name = "recommendations", description = "Per-user game recommendations"),
        (name = "moderation", description = "Review moderation and content heuristics"),
        (name = "collections", description = "Generic search over stored documents"),
        (name = "admin", description = "Maintenance operations guarded by X-Admin-Token"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/healthcheck",
            "/users/{id}",
            "/sessions/me",
            "/games/import/{external_id}",
            "/games/{id}/rating",
            "/reviews/{id}",
            "/tags/refresh",
            "/recommendations/latest",
            "/moderation/reviews/{id}/{event}",
            "/collections/{name}/search",
            "/admin/collections",
            "/admin/users/{id}/role",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn raw_documents_are_published_as_objects() {
        let doc = ApiDoc::openapi();
        let schemas = doc.components.expect("components").schemas;
        let value = serde_json::to_value(&schemas["DocumentBody"]).unwrap();
        assert_eq!(value["type"], "object");
        assert!(schemas.contains_key("RoleRequest"));
    }
}
