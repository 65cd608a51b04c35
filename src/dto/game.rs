use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::dao::{entities::GameData, models::Timestamp, repository::Record};

/// Payload used to add a game to the catalog.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// Display title, 1 to 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Studio that made the game.
    pub developer: Option<String>,
    /// Publisher.
    pub publisher: Option<String>,
    /// Genre labels.
    #[serde(default)]
    pub genre: Vec<String>,
    /// Platforms.
    #[serde(default)]
    pub platform: Vec<String>,
    /// Release date.
    pub release_date: Option<String>,
    /// Long description.
    pub description: Option<String>,
    /// Cover image URL.
    pub image: Option<String>,
    /// Availability label.
    pub status: Option<String>,
    /// Tag names to attach.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<CreateGameRequest> for GameData {
    fn from(value: CreateGameRequest) -> Self {
        Self {
            title: value.title.trim().to_owned(),
            developer: value.developer,
            publisher: value.publisher,
            genre: value.genre,
            platform: value.platform,
            release_date: value.release_date,
            description: value.description,
            image: value.image,
            status: value.status,
            tags: value.tags,
            external_id: None,
        }
    }
}

/// Partial catalog update; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameRequest {
    /// New title.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    /// New developer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    /// New publisher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Replacement genre list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    /// Replacement platform list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Vec<String>>,
    /// New release date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// New availability label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Replacement tag list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Catalog entry as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameResponse {
    /// Catalog identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Studio that made the game.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    /// Publisher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    /// Genre labels.
    pub genre: Vec<String>,
    /// Platforms.
    pub platform: Vec<String>,
    /// Release date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Availability label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Attached tag names.
    pub tags: Vec<String>,
    /// Deals API identifier for imported games.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Creation time.
    #[schema(value_type = String)]
    pub created_at: Timestamp,
    /// Time of the last update.
    #[schema(value_type = String)]
    pub updated_at: Timestamp,
}

impl From<Record<GameData>> for GameResponse {
    fn from(record: Record<GameData>) -> Self {
        let Record {
            id,
            created_at,
            updated_at,
            data,
        } = record;
        Self {
            id,
            title: data.title,
            developer: data.developer,
            publisher: data.publisher,
            genre: data.genre,
            platform: data.platform,
            release_date: data.release_date,
            description: data.description,
            image: data.image,
            status: data.status,
            tags: data.tags,
            external_id: data.external_id,
            created_at,
            updated_at,
        }
    }
}

/// Query string accepted by `GET /games`.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct GameListQuery {
    /// Case-insensitive match on title, developer, publisher, genre and tags.
    pub search: Option<String>,
}

/// Aggregate of the approved reviews of one game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Rated game.
    pub game_id: Uuid,
    /// Rounded to one decimal; 0 when there are no reviews.
    pub average_rating: f64,
    /// Number of approved reviews counted.
    pub review_count: usize,
}

/// Query string accepted by `GET /deals`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DealsParams {
    /// Title substring filter.
    pub title: Option<String>,
    /// Maximum sale price.
    pub upper_price: Option<f64>,
    /// Number of deals to return.
    pub page_size: Option<u32>,
}
