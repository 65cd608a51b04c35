use std::error::Error;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Result alias for backend operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result alias for document store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not complete the call.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Human-readable summary.
        message: String,
        /// Backend-specific cause.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }
}

/// Failures surfaced by the document store to the domain modules.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The payload violates the collection schema.
    #[error("validation failed for `{collection}`: {errors}")]
    Validation {
        /// Name of the collection.
        collection: &'static str,
        /// Field-level failures.
        errors: ValidationErrors,
    },
    /// A collection name that is not part of the registry.
    #[error("unknown collection `{0}`")]
    UnknownCollection(String),
    /// The requested document does not exist.
    #[error("document `{id}` not found in `{collection}`")]
    NotFound {
        /// Collection that was searched.
        collection: &'static str,
        /// Identifier that was not found.
        id: Uuid,
    },
    /// No backend installed, or the backend call failed.
    #[error(transparent)]
    Unavailable(#[from] StorageError),
    /// The store did not become ready before the caller's deadline.
    #[error("document store not ready")]
    NotReady,
    /// A stored document does not match the typed shape of its collection.
    #[error("document `{id}` in `{collection}` could not be decoded")]
    Decode {
        /// Name of the collection.
        collection: &'static str,
        /// Identifier of the stored document.
        id: Uuid,
        /// Decoding error.
        #[source]
        source: serde_json::Error,
    },
    /// A typed payload could not be turned into document fields.
    #[error("payload for `{collection}` could not be encoded as a JSON object")]
    Encode {
        /// Name of the collection.
        collection: &'static str,
        /// Serialization error; `None` when the payload is not an object.
        #[source]
        source: Option<serde_json::Error>,
    },
}

/// Marker error used when the store has no backend installed.
#[derive(Debug, Error)]
#[error("no storage backend installed")]
pub struct NoBackend;
