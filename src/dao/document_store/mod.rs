/// CouchDB backend over its HTTP API.
#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;
/// MongoDB backend over the official driver.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::{models::Document, schema::Collection, storage::StorageResult};
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the remote document database holding every collection.
///
/// Implementations persist documents verbatim: validation, timestamping and
/// merging happen in [`crate::dao::store::DocumentStore`].
pub trait DocumentBackend: Send + Sync {
    /// Store a new document.
    fn insert(&self, collection: Collection, document: Document)
    -> BoxFuture<'static, StorageResult<()>>;
    /// Load one document by id.
    fn fetch(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<Document>>>;
    /// Load every document of the collection.
    fn fetch_all(&self, collection: Collection) -> BoxFuture<'static, StorageResult<Vec<Document>>>;
    /// Overwrite an existing document.
    fn replace(
        &self,
        collection: Collection,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Returns whether a document was actually removed.
    fn remove(&self, collection: Collection, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Batched removal of every document in the collection, returning the count.
    fn remove_all(&self, collection: Collection) -> BoxFuture<'static, StorageResult<usize>>;
    /// Cheap round trip proving the backend is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Rebuild the underlying connection after a failed health check.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
