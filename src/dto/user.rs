use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::{
    entities::{UserData, UserRole},
    models::Timestamp,
    repository::Record,
};

/// Payload used to register a new account.
///
/// New accounts always start as members; roles are granted through the admin API.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Login name, unique (case-sensitive).
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Contact address, unique regardless of case.
    #[validate(email)]
    pub email: String,
    /// Name shown instead of the username.
    pub display_name: Option<String>,
    /// Free-form profile text.
    pub bio: Option<String>,
    /// Avatar image URL.
    pub avatar: Option<String>,
    /// Genres weighted by the recommendation engine.
    #[serde(default)]
    pub favorite_genres: Vec<String>,
}

impl From<CreateUserRequest> for UserData {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            username: value.username.trim().to_owned(),
            email: value.email.trim().to_owned(),
            display_name: value.display_name,
            bio: value.bio,
            avatar: value.avatar,
            favorite_genres: value.favorite_genres,
            role: UserRole::Member,
        }
    }
}

/// Partial profile update; absent fields are left untouched. The role cannot be changed here.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New login name; must stay unique.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 64))]
    pub username: Option<String>,
    /// New contact address; must stay unique.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    /// Name shown instead of the username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form profile text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Replaces the whole favorite genre list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_genres: Option<Vec<String>>,
}

/// Role assignment, accepted only through the admin API.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema)]
pub struct RoleRequest {
    /// Role the account is given.
    pub role: UserRole,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Stable identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Name shown instead of the username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Free-form profile text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Genres weighted by the recommendation engine.
    pub favorite_genres: Vec<String>,
    /// Permission level.
    pub role: UserRole,
    /// Creation time (ISO-8601).
    #[schema(value_type = String)]
    pub created_at: Timestamp,
    /// Last modification time (ISO-8601).
    #[schema(value_type = String)]
    pub updated_at: Timestamp,
}

impl From<Record<UserData>> for UserResponse {
    fn from(record: Record<UserData>) -> Self {
        let Record {
            id,
            created_at,
            updated_at,
            data,
        } = record;
        Self {
            id,
            username: data.username,
            email: data.email,
            display_name: data.display_name,
            bio: data.bio,
            avatar: data.avatar,
            favorite_genres: data.favorite_genres,
            role: data.role,
            created_at,
            updated_at,
        }
    }
}

/// Log in by username.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Existing username.
    #[validate(length(min = 1))]
    pub username: String,
}

/// Token and profile of a freshly opened session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Send back in `X-Session-Token`.
    pub token: String,
    /// The signed-in user.
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_serializes_only_present_fields() {
        let patch = UpdateUserRequest {
            bio: Some("Speedrunner".into()),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({ "bio": "Speedrunner" }));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "ana",
            "email": "not-an-email"
        }))
        .unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn registration_cannot_choose_a_role() {
        let request: CreateUserRequest = serde_json::from_value(serde_json::json!({
            "username": "mallory",
            "email": "mallory@example.com",
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(UserData::from(request).role, UserRole::Member);
    }
}
