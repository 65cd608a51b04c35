//! Error types shared by the CouchDB storage implementation.

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`CouchDaoError`] failures.
pub type CouchResult<T> = Result<T, CouchDaoError>;

/// Failures that can occur while interacting with CouchDB.
#[derive(Debug, Error)]
pub enum CouchDaoError {
    /// Required environment variable is missing.
    #[error("missing CouchDB environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build CouchDB client")]
    ClientBuilder {
        /// Builder error.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB rejected a GET against the target database.
    #[error("failed to query CouchDB database `{database}`")]
    DatabaseQuery {
        /// Database name.
        database: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB rejected a database creation request.
    #[error("failed to create CouchDB database `{database}`")]
    DatabaseCreate {
        /// Database name.
        database: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB returned an unexpected status code for a database operation.
    #[error("unexpected CouchDB database response status {status} for `{database}`")]
    DatabaseStatus {
        /// Database name.
        database: String,
        /// Status code CouchDB returned.
        status: StatusCode,
    },
    /// A request to a document endpoint could not be sent.
    #[error("failed to send CouchDB request to `{path}`")]
    RequestSend {
        /// Request path relative to the server root.
        path: String,
        /// Transport error.
        #[source]
        source: reqwest::Error,
    },
    /// CouchDB returned an unexpected status code for a document endpoint.
    #[error("unexpected CouchDB response status {status} for `{path}`")]
    RequestStatus {
        /// Request path relative to the server root.
        path: String,
        /// Status code CouchDB returned.
        status: StatusCode,
    },
    /// Response payload could not be parsed into JSON.
    #[error("failed to decode CouchDB response for `{path}`")]
    DecodeResponse {
        /// Request path relative to the server root.
        path: String,
        /// Decoding error.
        #[source]
        source: reqwest::Error,
    },
    /// A row returned by `_all_docs` is not a valid document.
    #[error("failed to deserialize CouchDB document `{doc_id}`")]
    DeserializeValue {
        /// Identifier of the offending row.
        doc_id: String,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },
    /// `_bulk_docs` reported per-document failures.
    #[error("CouchDB bulk delete rejected {failed} of {total} document(s) in `{prefix}`")]
    BulkRejected {
        /// Key prefix of the purged collection.
        prefix: String,
        /// Documents CouchDB refused to delete.
        failed: usize,
        /// Documents submitted.
        total: usize,
    },
}
