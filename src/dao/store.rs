//! Single point of access to the document database.
//!
//! Every write is validated against the collection schema, timestamps are
//! stamped here, and queries are evaluated in memory over a fresh scan of the
//! collection. Nothing is cached between calls.

use std::{sync::Arc, time::Duration};

use tokio::sync::{RwLock, watch};
use tokio::time::timeout;
use tracing::{debug, info};
use uuid::Uuid;

use super::{
    document_store::DocumentBackend,
    models::{Document, Fields, Timestamp},
    query::{SearchTerm, filter_documents},
    schema::Collection,
    storage::{NoBackend, StorageError, StoreError, StoreResult},
};

/// Cloneable handle shared by every domain module.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    backend: RwLock<Option<Arc<dyn DocumentBackend>>>,
    ready: watch::Sender<bool>,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// A store with no backend yet; every operation fails as unavailable until one is installed.
    pub fn new() -> Self {
        let (ready, _rx) = watch::channel(false);
        Self {
            inner: Arc::new(StoreInner {
                backend: RwLock::new(None),
                ready,
            }),
        }
    }

    /// A store that is immediately ready on `backend`.
    pub fn with_backend(backend: Arc<dyn DocumentBackend>) -> Self {
        let (ready, _rx) = watch::channel(true);
        Self {
            inner: Arc::new(StoreInner {
                backend: RwLock::new(Some(backend)),
                ready,
            }),
        }
    }

    /// Install a connected backend and wake every [`wait_for_ready`](Self::wait_for_ready) caller.
    pub async fn install_backend(&self, backend: Arc<dyn DocumentBackend>) {
        {
            let mut guard = self.inner.backend.write().await;
            *guard = Some(backend);
        }
        self.set_ready(true);
    }

    /// Drop the current backend; callers see `Unavailable` until a new one is installed.
    pub async fn clear_backend(&self) {
        {
            let mut guard = self.inner.backend.write().await;
            guard.take();
        }
        self.set_ready(false);
    }

    /// Flip the readiness flag without touching the installed backend.
    pub fn set_ready(&self, ready: bool) {
        let changed = self.inner.ready.send_if_modified(|current| {
            let changed = *current != ready;
            *current = ready;
            changed
        });
        if changed {
            info!(ready, "document store readiness changed");
        }
    }

    /// Whether a healthy backend is installed.
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.borrow()
    }

    /// Subscribe to readiness updates.
    pub fn readiness(&self) -> watch::Receiver<bool> {
        self.inner.ready.subscribe()
    }

    /// Suspend until the store reports ready. Never times out on its own;
    /// drop the future (or race it in `select!`) to cancel.
    pub async fn wait_for_ready(&self) {
        let mut rx = self.readiness();
        // The sender lives as long as `self`, so the channel cannot close here.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// [`wait_for_ready`](Self::wait_for_ready) bounded by a caller-chosen deadline.
    pub async fn wait_for_ready_timeout(&self, limit: Duration) -> StoreResult<()> {
        timeout(limit, self.wait_for_ready())
            .await
            .map_err(|_| StoreError::NotReady)
    }

    /// Installed backend, if any.
    pub async fn backend(&self) -> Option<Arc<dyn DocumentBackend>> {
        let guard = self.inner.backend.read().await;
        guard.as_ref().cloned()
    }

    async fn require_backend(&self) -> StoreResult<Arc<dyn DocumentBackend>> {
        self.backend().await.ok_or_else(|| {
            StoreError::Unavailable(StorageError::unavailable(
                "document store not connected".into(),
                NoBackend,
            ))
        })
    }

    /// Resolve a collection name against the schema registry.
    pub fn resolve(name: &str) -> StoreResult<Collection> {
        name.parse()
    }

    /// Validate, whitelist, stamp and persist a new document.
    pub async fn create(&self, collection: Collection, data: Fields) -> StoreResult<Document> {
        let fields = collection
            .schema()
            .prepare_create(data)
            .map_err(|errors| StoreError::Validation {
                collection: collection.name(),
                errors,
            })?;

        let backend = self.require_backend().await?;
        let document = Document::new(fields);
        backend.insert(collection, document.clone()).await?;
        debug!(collection = collection.name(), id = %document.id, "document created");
        Ok(document)
    }

    /// Fetch one document; `None` when absent.
    pub async fn read(&self, collection: Collection, id: Uuid) -> StoreResult<Option<Document>> {
        let backend = self.require_backend().await?;
        Ok(backend.fetch(collection, id).await?)
    }

    /// Every document of the collection, in no particular order.
    pub async fn read_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let backend = self.require_backend().await?;
        Ok(backend.fetch_all(collection).await?)
    }

    /// Merge `partial` onto the stored fields and refresh `updatedAt`.
    pub async fn update(
        &self,
        collection: Collection,
        id: Uuid,
        partial: Fields,
    ) -> StoreResult<Document> {
        let patch = collection
            .schema()
            .prepare_update(partial)
            .map_err(|errors| StoreError::Validation {
                collection: collection.name(),
                errors,
            })?;

        let backend = self.require_backend().await?;
        let mut document =
            backend
                .fetch(collection, id)
                .await?
                .ok_or(StoreError::NotFound {
                    collection: collection.name(),
                    id,
                })?;

        document.fields.extend(patch);
        document.updated_at = Timestamp::next_after(document.updated_at);
        backend.replace(collection, document.clone()).await?;
        debug!(collection = collection.name(), %id, "document updated");
        Ok(document)
    }

    /// Hard delete. Deleting an id that is already gone also reports success.
    pub async fn delete(&self, collection: Collection, id: Uuid) -> StoreResult<bool> {
        let backend = self.require_backend().await?;
        let removed = backend.remove(collection, id).await?;
        if !removed {
            debug!(collection = collection.name(), %id, "delete of absent document");
        }
        Ok(true)
    }

    /// Full scan of the collection filtered by `predicate`.
    pub async fn query<P>(&self, collection: Collection, predicate: P) -> StoreResult<Vec<Document>>
    where
        P: Fn(&Document) -> bool,
    {
        let documents = self.read_all(collection).await?;
        Ok(filter_documents(documents, predicate))
    }

    /// Case-insensitive substring search on `fields`, or every string field when empty.
    pub async fn search(
        &self,
        collection: Collection,
        term: &str,
        fields: &[&str],
    ) -> StoreResult<Vec<Document>> {
        let term = SearchTerm::new(term, fields);
        self.query(collection, |document| term.matches(document))
            .await
    }

    /// Remove every document of one collection in a single batch.
    pub async fn clear_collection(&self, collection: Collection) -> StoreResult<usize> {
        let backend = self.require_backend().await?;
        let removed = backend.remove_all(collection).await?;
        info!(collection = collection.name(), removed, "collection cleared");
        Ok(removed)
    }

    /// Clear every registered collection, returning the total removed.
    pub async fn clear_all(&self) -> StoreResult<usize> {
        let mut total = 0;
        for collection in Collection::ALL {
            total += self.clear_collection(collection).await?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::document_store::memory::MemoryBackend;
    use serde_json::{Value, json};

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    fn memory_store() -> (DocumentStore, MemoryBackend) {
        let backend = MemoryBackend::new();
        (DocumentStore::with_backend(Arc::new(backend.clone())), backend)
    }

    #[tokio::test]
    async fn create_assigns_novel_ids_and_whitelists_fields() {
        let (store, _) = memory_store();
        let first = store
            .create(
                Collection::Games,
                fields(json!({"title": "Hades", "developer": "Supergiant Games", "hack": 1})),
            )
            .await
            .unwrap();
        let second = store
            .create(Collection::Games, fields(json!({"title": "Celeste"})))
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(
            first.fields,
            fields(json!({"title": "Hades", "developer": "Supergiant Games"}))
        );
        assert_eq!(first.created_at, first.updated_at);

        let read = store.read(Collection::Games, first.id).await.unwrap();
        assert_eq!(read, Some(first));
    }

    #[tokio::test]
    async fn create_rejects_invalid_payload_without_writing() {
        let (store, _) = memory_store();
        let err = store
            .create(Collection::Users, fields(json!({"username": "ana", "email": ""})))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation { collection: "users", .. }));
        assert!(store.read_all(Collection::Users).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_and_advances_updated_at() {
        let (store, _) = memory_store();
        let created = store
            .create(Collection::Tags, fields(json!({"name": "Roguelike", "color": "#f00"})))
            .await
            .unwrap();

        let updated = store
            .update(Collection::Tags, created.id, fields(json!({"color": "#0f0"})))
            .await
            .unwrap();
        assert_eq!(updated.fields["name"], "Roguelike");
        assert_eq!(updated.fields["color"], "#0f0");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        let read = store
            .read(Collection::Tags, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(read.fields["color"], "#0f0");
        assert_eq!(read.updated_at, updated.updated_at);
    }

    #[tokio::test]
    async fn empty_update_is_stable() {
        let (store, _) = memory_store();
        let created = store
            .create(Collection::Tags, fields(json!({"name": "Indie"})))
            .await
            .unwrap();

        let once = store
            .update(Collection::Tags, created.id, Fields::new())
            .await
            .unwrap();
        let twice = store
            .update(Collection::Tags, created.id, Fields::new())
            .await
            .unwrap();
        assert_eq!(once.fields, twice.fields);
        assert_eq!(twice.fields, created.fields);
        assert!(twice.updated_at > once.updated_at);
    }

    #[tokio::test]
    async fn update_of_missing_document_is_not_found() {
        let (store, _) = memory_store();
        let id = Uuid::new_v4();
        let err = store
            .update(Collection::Games, id, fields(json!({"status": "released"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { collection: "games", id: missing } if missing == id));
    }

    #[tokio::test]
    async fn delete_removes_and_is_idempotent() {
        let (store, _) = memory_store();
        let created = store
            .create(Collection::Games, fields(json!({"title": "Hades"})))
            .await
            .unwrap();

        assert!(store.delete(Collection::Games, created.id).await.unwrap());
        assert_eq!(store.read(Collection::Games, created.id).await.unwrap(), None);
        assert!(store.delete(Collection::Games, created.id).await.unwrap());
    }

    #[tokio::test]
    async fn search_and_query_scan_the_collection() {
        let (store, _) = memory_store();
        for (title, developer) in [
            ("Hades", "Supergiant Games"),
            ("Bastion", "Supergiant Games"),
            ("Celeste", "Maddy Makes Games"),
        ] {
            store
                .create(
                    Collection::Games,
                    fields(json!({"title": title, "developer": developer})),
                )
                .await
                .unwrap();
        }

        let supergiant = store
            .search(Collection::Games, "SUPERGIANT", &["developer"])
            .await
            .unwrap();
        assert_eq!(supergiant.len(), 2);

        let short_titles = store
            .query(Collection::Games, |doc| {
                doc.str_field("title").is_some_and(|title| title.len() <= 5)
            })
            .await
            .unwrap();
        assert_eq!(short_titles.len(), 1);
        assert_eq!(short_titles[0].str_field("title"), Some("Hades"));
    }

    #[tokio::test]
    async fn clear_all_empties_every_collection() {
        let (store, _) = memory_store();
        store
            .create(Collection::Games, fields(json!({"title": "Hades"})))
            .await
            .unwrap();
        store
            .create(Collection::Tags, fields(json!({"name": "Action"})))
            .await
            .unwrap();

        assert_eq!(store.clear_all().await.unwrap(), 2);
        assert!(store.read_all(Collection::Games).await.unwrap().is_empty());
        assert!(store.read_all(Collection::Tags).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn backend_failures_surface_as_unavailable() {
        let (store, backend) = memory_store();
        backend.set_offline(true);
        let err = store.read_all(Collection::Games).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        let detached = DocumentStore::new();
        let err = detached
            .create(Collection::Tags, fields(json!({"name": "Action"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn wait_for_ready_resolves_once_backend_installed() {
        let store = DocumentStore::new();
        assert!(!store.is_ready());
        assert!(matches!(
            store
                .wait_for_ready_timeout(Duration::from_millis(20))
                .await,
            Err(StoreError::NotReady)
        ));

        let waiter = {
            let store = store.clone();
            tokio::spawn(async move { store.wait_for_ready().await })
        };
        store
            .install_backend(Arc::new(MemoryBackend::new()))
            .await;

        timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter woke up")
            .unwrap();
        assert!(store.is_ready());
    }

    #[test]
    fn resolve_rejects_unknown_names() {
        assert_eq!(DocumentStore::resolve("reviews").unwrap(), Collection::Reviews);
        assert!(matches!(
            DocumentStore::resolve("sessions"),
            Err(StoreError::UnknownCollection(_))
        ));
    }
}
