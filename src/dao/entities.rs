//! Typed payloads of every collection.
//!
//! Optional fields are skipped when `None` so a payload never writes explicit
//! nulls, which keeps the schema's required-field check meaningful.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::{deals::DealRecord, repository::Entity, schema::Collection},
    services::content_analysis::SentimentLabel,
    state::moderation::ModerationStatus,
};

/// Privilege level of an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular account.
    #[default]
    Member,
    /// May moderate reviews.
    Moderator,
    /// Full access, including role changes.
    Admin,
}

/// Account in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// Unique login name.
    pub username: String,
    /// Unique contact address.
    pub email: String,
    /// Name shown instead of the username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form profile text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Genres used to seed recommendations.
    #[serde(default)]
    pub favorite_genres: Vec<String>,
    /// Granted only through the admin role route.
    #[serde(default)]
    pub role: UserRole,
}

impl Entity for UserData {
    const COLLECTION: Collection = Collection::Users;
}

/// Catalog entry in the `games` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    /// Display title.
    pub title: String,
    /// Studio that made the game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    /// Company that published the game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Genre labels.
    #[serde(default)]
    pub genre: Vec<String>,
    /// Platforms the game runs on.
    #[serde(default)]
    pub platform: Vec<String>,
    /// Release date as sent by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Availability label such as `available`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Names of the tags attached to the game.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Identifier of the deal-API game this entry was imported from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Entity for GameData {
    const COLLECTION: Collection = Collection::Games;
}

impl GameData {
    /// Catalog entry for a game known only through the deals API.
    pub fn from_deal(deal: &DealRecord) -> Self {
        Self {
            title: deal.title.clone(),
            developer: Some("Unknown Developer".into()),
            genre: vec!["PC Game".into()],
            platform: vec!["PC".into()],
            description: Some(format!(
                "Deal price ${} (normally ${})",
                deal.sale_price, deal.normal_price
            )),
            image: deal.thumb.clone(),
            status: Some("available".into()),
            external_id: Some(deal.game_id.clone()),
            ..Default::default()
        }
    }
}

/// One user's review of one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewData {
    /// Reviewed game.
    pub game_id: Uuid,
    /// Author of the review.
    pub user_id: Uuid,
    /// Score from 1 to 5.
    pub rating: u8,
    /// Short headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Where the review stands in moderation.
    #[serde(default)]
    pub moderation_status: ModerationStatus,
    /// Number of readers who found it helpful.
    #[serde(default)]
    pub helpful_count: u32,
    /// Sentiment computed at submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
}

impl Entity for ReviewData {
    const COLLECTION: Collection = Collection::Reviews;
}

/// Game ranked for a user, with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoredGame {
    /// Catalog identifier.
    pub game_id: Uuid,
    /// Title at scoring time.
    pub title: String,
    /// Higher ranks first.
    pub score: f64,
}

/// Dated snapshot of a user's top recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationData {
    /// Owner of the snapshot.
    pub user_id: Uuid,
    /// Ranked games, best first.
    pub games: Vec<ScoredGame>,
    /// `YYYY-MM-DD` of generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_on: Option<String>,
}

impl Entity for RecommendationData {
    const COLLECTION: Collection = Collection::Recommendations;
}

/// Label attachable to games, unique by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagData {
    /// Unique tag name.
    pub name: String,
    /// What the tag means.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Derived from a scan of `games`; refreshed best-effort.
    #[serde(default)]
    pub game_count: u32,
}

impl Entity for TagData {
    const COLLECTION: Collection = Collection::Tags;
}

/// What a moderation log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    /// Heuristics held new content for review.
    AutoFlag,
    /// A moderator flagged the content.
    Flag,
    /// A moderator approved the content.
    Approve,
    /// A moderator rejected the content.
    Reject,
}

/// Kind of content a log entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModerationTarget {
    /// A game review.
    Review,
}

/// Append-only audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationLogData {
    /// What happened.
    pub action: ModerationAction,
    /// Kind of the moderated content.
    pub target_type: ModerationTarget,
    /// Identifier of the moderated content.
    pub target_id: Uuid,
    /// Acting moderator; `None` for automatic actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moderator_id: Option<Uuid>,
    /// Reason given by the moderator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Sentiment at the time of the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentLabel>,
    /// Confidence of the sentiment label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Spam score at the time of the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spam_score: Option<f64>,
    /// Status before the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<ModerationStatus>,
    /// Status after the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_status: Option<ModerationStatus>,
}

impl Entity for ModerationLogData {
    const COLLECTION: Collection = Collection::ModerationLogs;
}
