use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::{
    entities::{RecommendationData, ScoredGame},
    models::Timestamp,
    repository::Record,
};

/// Recommendation snapshot as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationResponse {
    /// Snapshot identifier.
    pub id: Uuid,
    /// User the snapshot belongs to.
    pub user_id: Uuid,
    /// Best first, at most ten entries.
    pub games: Vec<ScoredGame>,
    /// `YYYY-MM-DD` of generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_on: Option<String>,
    /// Creation time.
    #[schema(value_type = String)]
    pub created_at: Timestamp,
}

impl From<Record<RecommendationData>> for RecommendationResponse {
    fn from(record: Record<RecommendationData>) -> Self {
        Self {
            id: record.id,
            user_id: record.data.user_id,
            games: record.data.games,
            generated_on: record.data.generated_on,
            created_at: record.created_at,
        }
    }
}
