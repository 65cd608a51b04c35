//! In-memory filtering applied after a collection has been materialized.

use serde_json::Value;

use super::models::Document;

/// Case-insensitive substring search over the string fields of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
    fields: Vec<String>,
}

impl SearchTerm {
    /// Search `fields`, or every string-valued field when `fields` is empty.
    pub fn new(term: &str, fields: &[&str]) -> Self {
        Self {
            needle: term.trim().to_lowercase(),
            fields: fields.iter().map(|field| (*field).to_owned()).collect(),
        }
    }

    /// Whether the document matches. A blank term matches everything.
    pub fn matches(&self, document: &Document) -> bool {
        if self.needle.is_empty() {
            return true;
        }

        if self.fields.is_empty() {
            document
                .fields
                .values()
                .any(|value| value_contains(value, &self.needle))
        } else {
            self.fields
                .iter()
                .filter_map(|field| document.fields.get(field))
                .any(|value| value_contains(value, &self.needle))
        }
    }
}

/// Strings match directly; arrays match when any string element does.
fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text.to_lowercase().contains(needle),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|text| text.to_lowercase().contains(needle)),
        _ => false,
    }
}

/// Keep the documents accepted by `predicate`, preserving their order.
pub fn filter_documents<P>(documents: Vec<Document>, predicate: P) -> Vec<Document>
where
    P: Fn(&Document) -> bool,
{
    documents
        .into_iter()
        .filter(|document| predicate(document))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::Fields;
    use serde_json::json;

    fn game(value: Value) -> Document {
        let fields: Fields = value.as_object().cloned().unwrap();
        Document::new(fields)
    }

    #[test]
    fn search_ignores_case_across_all_string_fields() {
        let doc = game(json!({
            "title": "Hollow Knight",
            "developer": "Team Cherry",
            "genre": ["Metroidvania", "Action"],
            "rating": 5,
        }));

        assert!(SearchTerm::new("hollow", &[]).matches(&doc));
        assert!(SearchTerm::new("CHERRY", &[]).matches(&doc));
        assert!(SearchTerm::new("metroid", &[]).matches(&doc));
        assert!(!SearchTerm::new("5", &[]).matches(&doc));
    }

    #[test]
    fn search_restricted_to_listed_fields() {
        let doc = game(json!({"title": "Celeste", "developer": "Maddy Makes Games"}));

        assert!(SearchTerm::new("maddy", &["developer"]).matches(&doc));
        assert!(!SearchTerm::new("maddy", &["title"]).matches(&doc));
        assert!(!SearchTerm::new("maddy", &["missing"]).matches(&doc));
    }

    #[test]
    fn blank_term_matches_everything() {
        let doc = game(json!({"title": "Celeste"}));
        assert!(SearchTerm::new("   ", &["title"]).matches(&doc));
    }

    #[test]
    fn filter_keeps_matching_documents_in_order() {
        let docs = vec![
            game(json!({"title": "A", "status": "released"})),
            game(json!({"title": "B", "status": "upcoming"})),
            game(json!({"title": "C", "status": "released"})),
        ];

        let released = filter_documents(docs, |doc| doc.str_field("status") == Some("released"));
        let titles: Vec<_> = released
            .iter()
            .filter_map(|doc| doc.str_field("title"))
            .collect();
        assert_eq!(titles, ["A", "C"]);
    }
}
