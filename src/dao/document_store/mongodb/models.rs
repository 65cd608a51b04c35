use mongodb::bson::{Document as BsonDocument, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{Document, Fields, Timestamp};

/// Stored shape inside a MongoDB collection.
///
/// The identifier is kept as its string form: binary UUIDs would not survive
/// the JSON round trip the rest of the store relies on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoDocument {
    #[serde(rename = "_id")]
    id: String,
    created_at: Timestamp,
    updated_at: Timestamp,
    #[serde(flatten)]
    fields: Fields,
}

impl From<Document> for MongoDocument {
    fn from(value: Document) -> Self {
        Self {
            id: value.id.to_string(),
            created_at: value.created_at,
            updated_at: value.updated_at,
            fields: value.fields,
        }
    }
}

impl MongoDocument {
    /// Convert back, skipping rows whose `_id` was not written by this store.
    pub fn into_document(self) -> Option<Document> {
        let id = Uuid::parse_str(&self.id).ok()?;
        Some(Document {
            id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            fields: self.fields,
        })
    }
}

pub fn doc_id(id: Uuid) -> BsonDocument {
    doc! {"_id": id.to_string()}
}
