use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::dao::{models::Document, schema::Collection};

pub const END_SUFFIX: &str = "\u{ffff}";

#[derive(Debug, Deserialize)]
pub struct AllDocsResponse {
    pub rows: Vec<AllDocsRow>,
}

#[derive(Debug, Deserialize)]
pub struct AllDocsRow {
    pub id: String,
    #[serde(default)]
    pub value: Option<RowValue>,
    #[serde(default)]
    pub doc: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RowValue {
    pub rev: String,
}

/// Wire shape of a stored document: CouchDB bookkeeping plus the flat document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouchDocument {
    #[serde(rename = "_id")]
    pub doc_id: String,
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    #[serde(flatten)]
    pub document: Document,
}

impl CouchDocument {
    pub fn new(collection: Collection, document: Document, rev: Option<String>) -> Self {
        Self {
            doc_id: doc_id(collection, document.id),
            rev,
            document,
        }
    }
}

/// Minimal revision stub read before a write or delete.
#[derive(Debug, Deserialize)]
pub struct CouchRevision {
    #[serde(rename = "_rev")]
    pub rev: String,
}

#[derive(Debug, Serialize)]
pub struct BulkDocsRequest {
    pub docs: Vec<DeletionStub>,
}

#[derive(Debug, Serialize)]
pub struct DeletionStub {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_rev")]
    pub rev: String,
    #[serde(rename = "_deleted")]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct BulkDocsResult {
    #[serde(default)]
    pub error: Option<String>,
}

/// Key prefix shared by every document of `collection`.
pub fn collection_prefix(collection: Collection) -> String {
    format!("{}::", collection.name())
}

pub fn doc_id(collection: Collection, id: Uuid) -> String {
    format!("{}{}", collection_prefix(collection), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::Fields;
    use serde_json::json;

    #[test]
    fn couch_document_keeps_bookkeeping_apart_from_fields() {
        let mut fields = Fields::new();
        fields.insert("name".into(), json!("Roguelike"));
        let document = Document::new(fields);
        let id = document.id;

        let wire = CouchDocument::new(Collection::Tags, document.clone(), Some("1-abc".into()));
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["_id"], format!("tags::{id}"));
        assert_eq!(value["_rev"], "1-abc");
        assert_eq!(value["name"], "Roguelike");

        let back: CouchDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back.document, document);
        assert!(!back.document.fields.contains_key("_rev"));
    }
}
