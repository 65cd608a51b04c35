use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::{
        entities::{ModerationAction, ModerationLogData, ModerationTarget},
        models::Timestamp,
        repository::Record,
    },
    dto::review::ReviewResponse,
    services::content_analysis::{Sentiment, SentimentLabel, SpamAssessment},
    state::moderation::ModerationStatus,
};

/// Optional note attached to a moderation action.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct ModerationRequest {
    /// Free-form reason, up to 500 characters.
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Moderation log entry as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerationLogResponse {
    /// Log entry identifier.
    pub id: Uuid,
    /// What happened.
    pub action: ModerationAction,
    /// Kind of the moderated content.
    pub target_type: ModerationTarget,
    /// Identifier of the moderated content.
    pub target_id: Uuid,
    /// Acting moderator; absent for automatic actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderator_id: Option<Uuid>,
    /// Reason given by the moderator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Sentiment at the time of the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
    /// Confidence of the sentiment label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Spam score at the time of the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam_score: Option<f64>,
    /// Status before the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<ModerationStatus>,
    /// Status after the action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_status: Option<ModerationStatus>,
    /// When the action happened.
    #[schema(value_type = String)]
    pub created_at: Timestamp,
}

impl From<Record<ModerationLogData>> for ModerationLogResponse {
    fn from(record: Record<ModerationLogData>) -> Self {
        let Record {
            id,
            created_at,
            data,
            ..
        } = record;
        Self {
            id,
            action: data.action,
            target_type: data.target_type,
            target_id: data.target_id,
            moderator_id: data.moderator_id,
            reason: data.reason,
            sentiment: data.sentiment,
            confidence: data.confidence,
            spam_score: data.spam_score,
            previous_status: data.previous_status,
            new_status: data.new_status,
            created_at,
        }
    }
}

/// Review after a moderation action, with the log entry it produced.
#[derive(Debug, Serialize, ToSchema)]
pub struct ModerationOutcome {
    /// The review in its new state.
    pub review: ReviewResponse,
    /// The log entry written for the action.
    pub log: ModerationLogResponse,
}

/// Reviews per moderation status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    /// Visible reviews.
    pub approved: usize,
    /// Reviews waiting for a moderator.
    pub pending: usize,
    /// Hidden reviews.
    pub rejected: usize,
}

/// Moderation overview for moderators.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModerationDashboard {
    /// Reviews per status.
    pub counts: StatusCounts,
    /// Reviews waiting for a moderator, oldest first.
    pub pending_reviews: Vec<ReviewResponse>,
    /// Newest first.
    pub recent_logs: Vec<ModerationLogResponse>,
}

/// Ad-hoc text to run through the content heuristics.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AnalyzeRequest {
    /// Text to analyze, up to 10000 characters.
    #[validate(length(max = 10000))]
    pub text: String,
}

/// Sentiment and spam verdicts for one text.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeResponse {
    /// Sentiment verdict.
    pub sentiment: Sentiment,
    /// Spam verdict.
    pub spam: SpamAssessment,
}
