//! Typed access to one collection.
//!
//! Documents are decoded into their collection's struct here and nowhere else,
//! so domain code only ever handles [`Record`] values.

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

use super::{
    models::{Document, Fields, Timestamp},
    query::SearchTerm,
    schema::Collection,
    store::DocumentStore,
    storage::{StoreError, StoreResult},
};

/// Typed payload of a collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection holding documents of this type.
    const COLLECTION: Collection;
}

/// A decoded document: store-assigned metadata plus the typed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Creation time.
    pub created_at: Timestamp,
    /// Time of the last update.
    pub updated_at: Timestamp,
    /// Typed payload.
    pub data: T,
}

impl<T: Entity> Record<T> {
    /// Decode a raw document of `T::COLLECTION`.
    pub fn from_document(document: Document) -> StoreResult<Self> {
        let Document {
            id,
            created_at,
            updated_at,
            fields,
        } = document;

        let data = serde_json::from_value(Value::Object(fields)).map_err(|source| {
            StoreError::Decode {
                collection: T::COLLECTION.name(),
                id,
                source,
            }
        })?;

        Ok(Self {
            id,
            created_at,
            updated_at,
            data,
        })
    }
}

/// Serialize any payload into a field map for `collection`.
pub fn to_fields<S: Serialize + ?Sized>(collection: Collection, value: &S) -> StoreResult<Fields> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(StoreError::Encode {
            collection: collection.name(),
            source: None,
        }),
        Err(source) => Err(StoreError::Encode {
            collection: collection.name(),
            source: Some(source),
        }),
    }
}

/// Typed handle over one collection of the [`DocumentStore`].
pub struct Repository<T> {
    store: DocumentStore,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    /// Repository backed by `store`.
    pub fn new(store: DocumentStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// Validate and insert a new record.
    pub async fn create(&self, data: &T) -> StoreResult<Record<T>> {
        let fields = to_fields(T::COLLECTION, data)?;
        let document = self.store.create(T::COLLECTION, fields).await?;
        Record::from_document(document)
    }

    /// Load one record, `None` when absent.
    pub async fn find(&self, id: Uuid) -> StoreResult<Option<Record<T>>> {
        self.store
            .read(T::COLLECTION, id)
            .await?
            .map(Record::from_document)
            .transpose()
    }

    /// Like [`find`](Self::find) but absence is an error.
    pub async fn get(&self, id: Uuid) -> StoreResult<Record<T>> {
        self.find(id).await?.ok_or(StoreError::NotFound {
            collection: T::COLLECTION.name(),
            id,
        })
    }

    /// Every record of the collection.
    pub async fn list(&self) -> StoreResult<Vec<Record<T>>> {
        self.store
            .read_all(T::COLLECTION)
            .await?
            .into_iter()
            .map(Record::from_document)
            .collect()
    }

    /// Full scan keeping the records whose payload satisfies `predicate`.
    pub async fn filter<P>(&self, predicate: P) -> StoreResult<Vec<Record<T>>>
    where
        P: Fn(&T) -> bool,
    {
        let records = self.list().await?;
        Ok(records
            .into_iter()
            .filter(|record| predicate(&record.data))
            .collect())
    }

    /// Records whose `fields` contain `term`, case-insensitively.
    pub async fn search(&self, term: &str, fields: &[&str]) -> StoreResult<Vec<Record<T>>> {
        let term = SearchTerm::new(term, fields);
        self.store
            .query(T::COLLECTION, |document| term.matches(document))
            .await?
            .into_iter()
            .map(Record::from_document)
            .collect()
    }

    /// Merge a partial payload (any serializable patch, `None` fields skipped by the patch type).
    pub async fn update<P>(&self, id: Uuid, patch: &P) -> StoreResult<Record<T>>
    where
        P: Serialize + ?Sized,
    {
        let fields = to_fields(T::COLLECTION, patch)?;
        let document = self.store.update(T::COLLECTION, id, fields).await?;
        Record::from_document(document)
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}
