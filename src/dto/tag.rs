use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::{entities::TagData, repository::Record},
    dto::validation::validate_hex_color,
};

/// Payload used to create a tag.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    /// Unique name, 1 to 40 characters.
    #[validate(length(min = 1, max = 40))]
    pub name: String,
    /// What the tag means.
    pub description: Option<String>,
    /// `#rrggbb`.
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

impl From<CreateTagRequest> for TagData {
    fn from(value: CreateTagRequest) -> Self {
        Self {
            name: value.name.trim().to_owned(),
            description: value.description,
            color: value.color,
            game_count: 0,
        }
    }
}

/// Tag as returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    /// Tag identifier.
    pub id: Uuid,
    /// Unique name.
    pub name: String,
    /// What the tag means.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Games carrying the tag at the last refresh.
    pub game_count: u32,
}

impl From<Record<TagData>> for TagResponse {
    fn from(record: Record<TagData>) -> Self {
        Self {
            id: record.id,
            name: record.data.name,
            description: record.data.description,
            color: record.data.color,
            game_count: record.data.game_count,
        }
    }
}

/// Outcome of a best-effort `gameCount` refresh.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TagRefreshResponse {
    /// Tags whose count was written.
    pub updated: usize,
    /// Tags whose write failed.
    pub failed: usize,
}
