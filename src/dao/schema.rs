//! Static registry of the collections and the fields each one accepts.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::{ValidationError, ValidationErrors};

use super::{models::Fields, storage::StoreError};

/// Named set of documents sharing a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    /// Accounts.
    Users,
    /// Game catalog.
    Games,
    /// Reviews of games.
    Reviews,
    /// Per-user recommendation snapshots.
    Recommendations,
    /// Tags attachable to games.
    Tags,
    /// Audit log of moderation actions.
    ModerationLogs,
}

/// Required and allowed fields of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSchema {
    /// Fields every document must carry.
    pub required: &'static [&'static str],
    /// Every field a document may carry.
    pub fields: &'static [&'static str],
}

const USERS: CollectionSchema = CollectionSchema {
    required: &["username", "email"],
    fields: &[
        "username",
        "email",
        "displayName",
        "bio",
        "avatar",
        "favoriteGenres",
        "role",
    ],
};

const GAMES: CollectionSchema = CollectionSchema {
    required: &["title"],
    fields: &[
        "title",
        "developer",
        "publisher",
        "genre",
        "platform",
        "releaseDate",
        "description",
        "image",
        "status",
        "tags",
        "externalId",
    ],
};

const REVIEWS: CollectionSchema = CollectionSchema {
    required: &["gameId", "userId", "rating"],
    fields: &[
        "gameId",
        "userId",
        "rating",
        "title",
        "content",
        "moderationStatus",
        "helpfulCount",
        "sentiment",
    ],
};

const RECOMMENDATIONS: CollectionSchema = CollectionSchema {
    required: &["userId", "games"],
    fields: &["userId", "games", "generatedOn"],
};

const TAGS: CollectionSchema = CollectionSchema {
    required: &["name"],
    fields: &["name", "description", "color", "gameCount"],
};

const MODERATION_LOGS: CollectionSchema = CollectionSchema {
    required: &["action", "targetType", "targetId"],
    fields: &[
        "action",
        "targetType",
        "targetId",
        "moderatorId",
        "reason",
        "sentiment",
        "confidence",
        "spamScore",
        "previousStatus",
        "newStatus",
    ],
};

impl Collection {
    /// Every registered collection, in registry order.
    pub const ALL: [Collection; 6] = [
        Collection::Users,
        Collection::Games,
        Collection::Reviews,
        Collection::Recommendations,
        Collection::Tags,
        Collection::ModerationLogs,
    ];

    /// Name of the bucket backing this collection.
    pub fn name(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Games => "games",
            Collection::Reviews => "reviews",
            Collection::Recommendations => "recommendations",
            Collection::Tags => "tags",
            Collection::ModerationLogs => "moderationLogs",
        }
    }

    /// Field rules of the collection.
    pub fn schema(self) -> &'static CollectionSchema {
        match self {
            Collection::Users => &USERS,
            Collection::Games => &GAMES,
            Collection::Reviews => &REVIEWS,
            Collection::Recommendations => &RECOMMENDATIONS,
            Collection::Tags => &TAGS,
            Collection::ModerationLogs => &MODERATION_LOGS,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = StoreError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|collection| collection.name() == name)
            .ok_or_else(|| StoreError::UnknownCollection(name.to_owned()))
    }
}

impl CollectionSchema {
    /// Whether `field` survives a write to this collection.
    pub fn allows(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// Drop every field that is not whitelisted.
    pub fn sanitize(&self, mut data: Fields) -> Fields {
        data.retain(|key, _| self.allows(key));
        data
    }

    /// Whitelist `data` and require every required field to be present and non-empty.
    pub fn prepare_create(&self, data: Fields) -> Result<Fields, ValidationErrors> {
        let data = self.sanitize(data);
        let mut errors = ValidationErrors::new();
        for &field in self.required {
            if is_blank(data.get(field)) {
                errors.add(field, required_error(field));
            }
        }

        if errors.is_empty() {
            Ok(data)
        } else {
            Err(errors)
        }
    }

    /// Whitelist a partial update. Required fields may be omitted but not blanked.
    pub fn prepare_update(&self, data: Fields) -> Result<Fields, ValidationErrors> {
        let data = self.sanitize(data);
        let mut errors = ValidationErrors::new();
        for &field in self.required {
            if data.contains_key(field) && is_blank(data.get(field)) {
                errors.add(field, required_error(field));
            }
        }

        if errors.is_empty() {
            Ok(data)
        } else {
            Err(errors)
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty(),
        Some(_) => false,
    }
}

fn required_error(field: &str) -> ValidationError {
    let mut err = ValidationError::new("required");
    err.message = Some(format!("field `{field}` is required").into());
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn names_resolve_back_to_collections() {
        for collection in Collection::ALL {
            assert_eq!(collection.name().parse::<Collection>().unwrap(), collection);
        }
        assert!(matches!(
            "blink_monitoring".parse::<Collection>(),
            Err(StoreError::UnknownCollection(name)) if name == "blink_monitoring"
        ));
    }

    #[test]
    fn create_strips_unknown_fields() {
        let data = fields(json!({
            "title": "Hades",
            "developer": "Supergiant Games",
            "id": "spoofed",
            "createdAt": "1970-01-01T00:00:00.000Z",
            "secret": true,
        }));

        let sanitized = Collection::Games.schema().prepare_create(data).unwrap();
        assert_eq!(
            sanitized,
            fields(json!({"title": "Hades", "developer": "Supergiant Games"}))
        );
    }

    #[test]
    fn create_rejects_missing_null_and_empty_required_fields() {
        let data = fields(json!({"username": "", "email": null, "bio": "hi"}));
        let errors = Collection::Users.schema().prepare_create(data).unwrap_err();
        let failing = errors.field_errors();
        assert!(failing.contains_key("username"));
        assert!(failing.contains_key("email"));
        assert_eq!(failing.len(), 2);
    }

    #[test]
    fn update_allows_omitting_required_fields() {
        let schema = Collection::Reviews.schema();
        let patch = schema
            .prepare_update(fields(json!({"content": "still great", "bogus": 1})))
            .unwrap();
        assert_eq!(patch, fields(json!({"content": "still great"})));

        assert!(schema
            .prepare_update(fields(json!({"rating": null})))
            .is_err());
    }

    #[test]
    fn store_assigned_fields_are_never_whitelisted() {
        for collection in Collection::ALL {
            let schema = collection.schema();
            for reserved in ["id", "createdAt", "updatedAt", "_id", "_rev"] {
                assert!(!schema.allows(reserved), "{collection} allows {reserved}");
            }
            for required in schema.required {
                assert!(schema.allows(required));
            }
        }
    }
}
