use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::{entities::ReviewData, models::Timestamp, repository::Record},
    dto::game::RatingSummary,
    services::content_analysis::SentimentLabel,
    state::moderation::ModerationStatus,
};

/// Review submitted by the session's user.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    /// Reviewed game.
    pub game_id: Uuid,
    /// Whole stars, 1 to 5.
    pub rating: u8,
    /// Short headline, up to 200 characters.
    #[validate(length(max = 200))]
    pub title: Option<String>,
    /// Body text, up to 10000 characters.
    #[validate(length(max = 10000))]
    pub content: Option<String>,
}

/// Author edit of a review; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    /// New star rating.
    pub rating: Option<u8>,
    /// New headline.
    #[validate(length(max = 200))]
    pub title: Option<String>,
    /// New body text.
    #[validate(length(max = 10000))]
    pub content: Option<String>,
}

/// Review as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    /// Review identifier.
    pub id: Uuid,
    /// Reviewed game.
    pub game_id: Uuid,
    /// Author.
    pub user_id: Uuid,
    /// Whole stars, 1 to 5.
    pub rating: u8,
    /// Short headline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Moderation state.
    pub moderation_status: ModerationStatus,
    /// Helpful votes.
    pub helpful_count: u32,
    /// Sentiment computed at submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
    /// Creation time.
    #[schema(value_type = String)]
    pub created_at: Timestamp,
    /// Time of the last update.
    #[schema(value_type = String)]
    pub updated_at: Timestamp,
}

impl From<Record<ReviewData>> for ReviewResponse {
    fn from(record: Record<ReviewData>) -> Self {
        let Record {
            id,
            created_at,
            updated_at,
            data,
        } = record;
        Self {
            id,
            game_id: data.game_id,
            user_id: data.user_id,
            rating: data.rating,
            title: data.title,
            content: data.content,
            moderation_status: data.moderation_status,
            helpful_count: data.helpful_count,
            sentiment: data.sentiment,
            created_at,
            updated_at,
        }
    }
}

/// A review write together with the refreshed rating of its game.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewWriteResponse {
    /// The written review; absent after a delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<ReviewResponse>,
    /// Refreshed rating of the game.
    pub rating: RatingSummary,
}
