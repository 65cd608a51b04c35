//! Process-local backend used for tests and offline runs.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use dashmap::DashMap;
use futures::future::BoxFuture;
use thiserror::Error;
use uuid::Uuid;

use crate::dao::{
    document_store::DocumentBackend,
    models::Document,
    schema::Collection,
    storage::{StorageError, StorageResult},
};

/// Raised while the memory backend is switched offline.
#[derive(Debug, Error)]
#[error("memory backend is offline")]
pub struct Offline;

/// Process-local backend keeping each collection in a concurrent map.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    buckets: Arc<DashMap<Collection, DashMap<Uuid, Document>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryBackend {
    /// Empty, online backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a lost connection: every call fails until switched back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> StorageResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StorageError::unavailable(Offline.to_string(), Offline))
        } else {
            Ok(())
        }
    }

    fn write(&self, collection: Collection, document: Document) -> StorageResult<()> {
        self.ensure_online()?;
        self.buckets
            .entry(collection)
            .or_default()
            .insert(document.id, document);
        Ok(())
    }
}

impl DocumentBackend for MemoryBackend {
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.write(collection, document);
        Box::pin(async move { result })
    }

    fn fetch(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let backend = self.clone();
        Box::pin(async move {
            backend.ensure_online()?;
            Ok(backend
                .buckets
                .get(&collection)
                .and_then(|bucket| bucket.get(&id).map(|entry| entry.value().clone())))
        })
    }

    fn fetch_all(&self, collection: Collection) -> BoxFuture<'static, StorageResult<Vec<Document>>> {
        let backend = self.clone();
        Box::pin(async move {
            backend.ensure_online()?;
            Ok(backend
                .buckets
                .get(&collection)
                .map(|bucket| bucket.iter().map(|entry| entry.value().clone()).collect())
                .unwrap_or_default())
        })
    }

    fn replace(
        &self,
        collection: Collection,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.write(collection, document);
        Box::pin(async move { result })
    }

    fn remove(&self, collection: Collection, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let backend = self.clone();
        Box::pin(async move {
            backend.ensure_online()?;
            Ok(backend
                .buckets
                .get(&collection)
                .and_then(|bucket| bucket.remove(&id))
                .is_some())
        })
    }

    fn remove_all(&self, collection: Collection) -> BoxFuture<'static, StorageResult<usize>> {
        let backend = self.clone();
        Box::pin(async move {
            backend.ensure_online()?;
            Ok(backend
                .buckets
                .remove(&collection)
                .map(|(_, bucket)| bucket.len())
                .unwrap_or(0))
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.ensure_online();
        Box::pin(async move { result })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let result = self.ensure_online();
        Box::pin(async move { result })
    }
}
