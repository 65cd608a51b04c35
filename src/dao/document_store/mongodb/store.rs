use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{Collection as MongoCollection, Database, bson::doc};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::open_database,
    error::{MongoDaoError, MongoResult},
    models::{MongoDocument, doc_id},
};
use crate::dao::{
    document_store::DocumentBackend, models::Document, schema::Collection, storage::StorageResult,
};

/// Each collection maps to the MongoDB collection of the same name.
#[derive(Clone)]
pub struct MongoDocumentStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    database: RwLock<Database>,
    config: MongoConfig,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = self.database.read().await.clone();

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let database = open_database(&self.config).await?;
        *self.database.write().await = database;
        Ok(())
    }
}

impl MongoDocumentStore {
    /// Connect to MongoDB, waiting for the server to answer a ping.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let database = open_database(&config).await?;
        info!(database = %config.database_name, "connected to MongoDB");

        let inner = Arc::new(MongoInner {
            database: RwLock::new(database),
            config,
        });

        Ok(Self { inner })
    }

    async fn collection(&self, collection: Collection) -> MongoCollection<MongoDocument> {
        self.inner
            .database
            .read()
            .await
            .collection::<MongoDocument>(collection.name())
    }

    async fn upsert(&self, collection: Collection, document: Document) -> MongoResult<()> {
        let id = document.id;
        let record: MongoDocument = document.into();
        self.collection(collection)
            .await
            .replace_one(doc_id(id), &record)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: collection.name(),
                id,
                source,
            })?;
        Ok(())
    }

    async fn find(&self, collection: Collection, id: Uuid) -> MongoResult<Option<Document>> {
        let record = self
            .collection(collection)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Load {
                collection: collection.name(),
                id,
                source,
            })?;

        Ok(record.and_then(MongoDocument::into_document))
    }

    async fn list(&self, collection: Collection) -> MongoResult<Vec<Document>> {
        let records: Vec<MongoDocument> = self
            .collection(collection)
            .await
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::List {
                collection: collection.name(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::List {
                collection: collection.name(),
                source,
            })?;

        let total = records.len();
        let documents: Vec<Document> = records
            .into_iter()
            .filter_map(MongoDocument::into_document)
            .collect();
        if documents.len() != total {
            warn!(
                collection = collection.name(),
                skipped = total - documents.len(),
                "ignored MongoDB rows with foreign identifiers"
            );
        }
        Ok(documents)
    }

    async fn delete_one(&self, collection: Collection, id: Uuid) -> MongoResult<bool> {
        let result = self
            .collection(collection)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Delete {
                collection: collection.name(),
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_all(&self, collection: Collection) -> MongoResult<usize> {
        let result = self
            .collection(collection)
            .await
            .delete_many(doc! {})
            .await
            .map_err(|source| MongoDaoError::Delete {
                collection: collection.name(),
                source,
            })?;
        Ok(result.deleted_count as usize)
    }
}

impl DocumentBackend for MongoDocumentStore {
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert(collection, document).await.map_err(Into::into) })
    }

    fn fetch(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.find(collection, id).await.map_err(Into::into) })
    }

    fn fetch_all(&self, collection: Collection) -> BoxFuture<'static, StorageResult<Vec<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.list(collection).await.map_err(Into::into) })
    }

    fn replace(
        &self,
        collection: Collection,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert(collection, document).await.map_err(Into::into) })
    }

    fn remove(&self, collection: Collection, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_one(collection, id).await.map_err(Into::into) })
    }

    fn remove_all(&self, collection: Collection) -> BoxFuture<'static, StorageResult<usize>> {
        let store = self.clone();
        Box::pin(async move { store.delete_all(collection).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
