use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::from_value;
use tracing::debug;
use uuid::Uuid;

use crate::dao::{
    document_store::DocumentBackend, models::Document, schema::Collection, storage::StorageResult,
};

use super::{
    config::CouchConfig,
    error::{CouchDaoError, CouchResult},
    models::{
        AllDocsResponse, BulkDocsRequest, BulkDocsResult, CouchDocument, CouchRevision,
        DeletionStub, END_SUFFIX, collection_prefix, doc_id,
    },
};

const ALL_DOCS: &str = "_all_docs";
const BULK_DOCS: &str = "_bulk_docs";

/// All collections share one CouchDB database; documents are keyed `{collection}::{uuid}`.
#[derive(Clone)]
pub struct CouchDocumentStore {
    client: Client,
    base_url: Arc<str>,
    database: Arc<str>,
    auth: Option<(Arc<str>, Arc<str>)>,
}

impl CouchDocumentStore {
    /// Establish a connection to CouchDB and ensure the database exists.
    pub async fn connect(config: CouchConfig) -> CouchResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CouchDaoError::ClientBuilder { source })?;

        let base_url = Arc::<str>::from(config.base_url.trim_end_matches('/'));
        let database = Arc::<str>::from(config.database);
        let auth = config
            .username
            .zip(config.password)
            .map(|(u, p)| (Arc::<str>::from(u), Arc::<str>::from(p)));

        let store = Self {
            client,
            base_url,
            database,
            auth,
        };

        store.ensure_database().await?;
        Ok(store)
    }

    fn database_url(&self) -> String {
        format!("{}/{}", self.base_url, self.database)
    }

    fn with_auth(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some((ref user, ref pass)) = self.auth {
            builder.basic_auth(user.as_ref(), Some(pass.as_ref()))
        } else {
            builder
        }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.database_url(), path);
        self.with_auth(self.client.request(method, url))
    }

    async fn ensure_database(&self) -> CouchResult<()> {
        let database = self.database.to_string();
        let url = self.database_url();

        let response = self
            .with_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|source| CouchDaoError::DatabaseQuery {
                database: database.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::NOT_FOUND => {
                let create = self
                    .with_auth(self.client.put(&url))
                    .send()
                    .await
                    .map_err(|source| CouchDaoError::DatabaseCreate {
                        database: database.clone(),
                        source,
                    })?;
                if create.status().is_success() {
                    debug!(%database, "created CouchDB database");
                    Ok(())
                } else {
                    Err(CouchDaoError::DatabaseStatus {
                        database,
                        status: create.status(),
                    })
                }
            }
            other => Err(CouchDaoError::DatabaseStatus {
                database,
                status: other,
            }),
        }
    }

    async fn get_document<T>(&self, doc_id: &str) -> CouchResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::GET, doc_id)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    CouchDaoError::DecodeResponse {
                        path: doc_id.to_string(),
                        source,
                    }
                })
            }
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: other,
            }),
        }
    }

    async fn put_document<T>(&self, doc_id: &str, document: &T) -> CouchResult<()>
    where
        T: ?Sized + Serialize,
    {
        let response = self
            .request(Method::PUT, doc_id)
            .json(document)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: doc_id.to_string(),
                status: response.status(),
            })
        }
    }

    async fn current_revision(&self, doc_id: &str) -> CouchResult<Option<String>> {
        Ok(self
            .get_document::<CouchRevision>(doc_id)
            .await?
            .map(|stub| stub.rev))
    }

    async fn all_docs(&self, prefix: &str, include_docs: bool) -> CouchResult<AllDocsResponse> {
        let query = [
            ("include_docs", include_docs.to_string()),
            ("startkey", format!("\"{}\"", prefix)),
            ("endkey", format!("\"{}{}\"", prefix, END_SUFFIX)),
        ];

        let response = self
            .request(Method::GET, ALL_DOCS)
            .query(&query)
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: ALL_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: ALL_DOCS.to_string(),
                status: response.status(),
            });
        }

        response
            .json::<AllDocsResponse>()
            .await
            .map_err(|source| CouchDaoError::DecodeResponse {
                path: ALL_DOCS.to_string(),
                source,
            })
    }

    async fn list_documents(&self, collection: Collection) -> CouchResult<Vec<Document>> {
        let payload = self
            .all_docs(&collection_prefix(collection), true)
            .await?;

        let mut documents = Vec::with_capacity(payload.rows.len());
        for row in payload.rows {
            if let Some(doc) = row.doc {
                let parsed: CouchDocument =
                    from_value(doc).map_err(|source| CouchDaoError::DeserializeValue {
                        doc_id: row.id.clone(),
                        source,
                    })?;
                documents.push(parsed.document);
            }
        }

        Ok(documents)
    }

    async fn save(
        &self,
        collection: Collection,
        document: Document,
        lookup_rev: bool,
    ) -> CouchResult<()> {
        let doc_id = doc_id(collection, document.id);
        let rev = if lookup_rev {
            self.current_revision(&doc_id).await?
        } else {
            None
        };
        let wire = CouchDocument::new(collection, document, rev);
        self.put_document(&doc_id, &wire).await
    }

    async fn delete_document(&self, collection: Collection, id: Uuid) -> CouchResult<bool> {
        let doc_id = doc_id(collection, id);
        let Some(rev) = self.current_revision(&doc_id).await? else {
            return Ok(false);
        };

        let response = self
            .request(Method::DELETE, &doc_id)
            .query(&[("rev", rev)])
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: doc_id.clone(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => Ok(true),
            other => Err(CouchDaoError::RequestStatus {
                path: doc_id,
                status: other,
            }),
        }
    }

    async fn delete_collection(&self, collection: Collection) -> CouchResult<usize> {
        let prefix = collection_prefix(collection);
        let payload = self.all_docs(&prefix, false).await?;
        let docs: Vec<DeletionStub> = payload
            .rows
            .into_iter()
            .filter_map(|row| {
                row.value.map(|value| DeletionStub {
                    id: row.id,
                    rev: value.rev,
                    deleted: true,
                })
            })
            .collect();

        let total = docs.len();
        if total == 0 {
            return Ok(0);
        }

        let response = self
            .request(Method::POST, BULK_DOCS)
            .json(&BulkDocsRequest { docs })
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: BULK_DOCS.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(CouchDaoError::RequestStatus {
                path: BULK_DOCS.to_string(),
                status: response.status(),
            });
        }

        let results = response
            .json::<Vec<BulkDocsResult>>()
            .await
            .map_err(|source| CouchDaoError::DecodeResponse {
                path: BULK_DOCS.to_string(),
                source,
            })?;

        let failed = results.iter().filter(|row| row.error.is_some()).count();
        if failed > 0 {
            return Err(CouchDaoError::BulkRejected {
                prefix,
                failed,
                total,
            });
        }

        Ok(total)
    }

    async fn ping(&self) -> CouchResult<()> {
        let url = self.database_url();
        let response = self
            .with_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|source| CouchDaoError::RequestSend {
                path: url.clone(),
                source,
            })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CouchDaoError::RequestStatus {
                path: url,
                status: response.status(),
            })
        }
    }
}

impl DocumentBackend for CouchDocumentStore {
    fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .save(collection, document, false)
                .await
                .map_err(Into::into)
        })
    }

    fn fetch(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<Document>>> {
        let store = self.clone();
        Box::pin(async move {
            let maybe_doc = store
                .get_document::<CouchDocument>(&doc_id(collection, id))
                .await?;
            Ok(maybe_doc.map(|doc| doc.document))
        })
    }

    fn fetch_all(&self, collection: Collection) -> BoxFuture<'static, StorageResult<Vec<Document>>> {
        let store = self.clone();
        Box::pin(async move { store.list_documents(collection).await.map_err(Into::into) })
    }

    fn replace(
        &self,
        collection: Collection,
        document: Document,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .save(collection, document, true)
                .await
                .map_err(Into::into)
        })
    }

    fn remove(&self, collection: Collection, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_document(collection, id)
                .await
                .map_err(Into::into)
        })
    }

    fn remove_all(&self, collection: Collection) -> BoxFuture<'static, StorageResult<usize>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_collection(collection)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ensure_database().await.map_err(Into::into) })
    }
}
