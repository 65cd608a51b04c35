/// Client for the external game-deals API.
pub mod deals;
/// Backends the document store can run on.
pub mod document_store;
/// Typed payloads of each collection.
pub mod entities;
/// Document and timestamp model shared by all backends.
pub mod models;
/// In-memory filtering and text search over documents.
pub mod query;
/// Typed per-collection access.
pub mod repository;
/// Collection schema registry.
pub mod schema;
/// Error types of the storage layer.
pub mod storage;
/// Schema-validating store client.
pub mod store;
