mod config;
mod connection;
mod error;
mod models;
/// [`DocumentBackend`](crate::dao::document_store::DocumentBackend) implementation over MongoDB.
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoDocumentStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
