use tracing::warn;

use crate::{
    dao::{models::Document, schema::Collection, store::DocumentStore},
    dto::collection::PurgeResponse,
    error::ServiceError,
    state::SharedState,
};

/// Generic text search over any registered collection, oldest first.
pub async fn search(
    state: &SharedState,
    name: &str,
    term: &str,
    fields: &[&str],
) -> Result<Vec<Document>, ServiceError> {
    let collection = DocumentStore::resolve(name)?;
    let schema = collection.schema();
    if let Some(unknown) = fields.iter().find(|field| !schema.allows(field)) {
        return Err(ServiceError::InvalidInput(format!(
            "`{unknown}` is not a field of `{collection}`"
        )));
    }

    let mut documents = state.store().search(collection, term, fields).await?;
    documents.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(documents)
}

/// Delete every document of one collection, or of all collections when `name` is `None`.
pub async fn purge(state: &SharedState, name: Option<&str>) -> Result<PurgeResponse, ServiceError> {
    let store = state.store();
    let response = match name {
        Some(name) => {
            let collection = DocumentStore::resolve(name)?;
            let removed = store.clear_collection(collection).await?;
            PurgeResponse {
                collections: vec![collection],
                removed,
            }
        }
        None => PurgeResponse {
            collections: Collection::ALL.to_vec(),
            removed: store.clear_all().await?,
        },
    };

    if response.collections.contains(&Collection::Users) {
        state.close_all_sessions();
    }
    warn!(removed = response.removed, collections = ?response.collections, "collections purged");
    Ok(response)
}
