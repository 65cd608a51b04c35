/// Generic search and bulk purge over raw collections.
pub mod collection_service;
/// Sentiment and spam heuristics.
pub mod content_analysis;
/// OpenAPI documentation generation.
pub mod documentation;
/// Catalog management and deals import.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Review moderation workflow and audit log.
pub mod moderation_service;
/// Per-user game recommendations.
pub mod recommendation_service;
/// Reviews and derived game ratings.
pub mod review_service;
/// Storage connection supervisor driving store readiness.
pub mod storage_supervisor;
/// Tags and their game counters.
pub mod tag_service;
/// Accounts and sessions.
pub mod user_service;
