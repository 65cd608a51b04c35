use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::dao::schema::Collection;

/// Query string of the generic search route.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Substring to look for; empty matches everything.
    #[serde(default)]
    pub term: String,
    /// Comma-separated field names; every string field when omitted.
    pub fields: Option<String>,
}

impl SearchParams {
    /// Requested field names, trimmed, empty entries dropped.
    pub fn field_list(&self) -> Vec<&str> {
        self.fields
            .as_deref()
            .map(|fields| {
                fields
                    .split(',')
                    .map(str::trim)
                    .filter(|field| !field.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Documents removed by an admin purge.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurgeResponse {
    /// Collections that were emptied.
    pub collections: Vec<Collection>,
    /// Total number of documents removed.
    pub removed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_list_splits_and_trims() {
        let params = SearchParams {
            term: "rpg".into(),
            fields: Some("title, genre,,".into()),
        };
        assert_eq!(params.field_list(), vec!["title", "genre"]);
        assert!(SearchParams::default().field_list().is_empty());
    }
}
