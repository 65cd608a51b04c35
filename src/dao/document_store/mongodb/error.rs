use mongodb::error::Error as MongoError;
use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB operations.
pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

/// Failures raised by the MongoDB backend.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    /// A required environment variable is unset.
    #[error("missing MongoDB environment variable `{var}`")]
    MissingEnvVar {
        /// Name of the missing variable.
        var: &'static str,
    },
    /// `MONGO_URI` is not a valid connection string.
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        /// The rejected URI.
        uri: String,
        /// Driver parse error.
        #[source]
        source: MongoError,
    },
    /// The driver refused the parsed options.
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// The server never answered the startup ping.
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        /// Number of pings attempted.
        attempts: u32,
        /// Last driver error.
        #[source]
        source: MongoError,
    },
    /// A health ping on a live connection failed.
    #[error("MongoDB ping health check failed")]
    HealthPing {
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// An insert or replace was rejected.
    #[error("failed to write document `{id}` to `{collection}`")]
    Write {
        /// Target collection.
        collection: &'static str,
        /// Document identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A single-document read failed.
    #[error("failed to load document `{id}` from `{collection}`")]
    Load {
        /// Target collection.
        collection: &'static str,
        /// Document identifier.
        id: Uuid,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// Listing a collection failed.
    #[error("failed to list `{collection}`")]
    List {
        /// Target collection.
        collection: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
    /// A delete was rejected.
    #[error("failed to delete from `{collection}`")]
    Delete {
        /// Target collection.
        collection: &'static str,
        /// Driver error.
        #[source]
        source: MongoError,
    },
}
