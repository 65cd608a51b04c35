//! Library crate for gamehub-local, exposing modules for binaries and integration tests.

pub mod config;
/// Document store, collection registry and external clients.
pub mod dao;
/// Request and response bodies of the REST API.
pub mod dto;
/// HTTP-facing error type.
pub mod error;
/// Axum routers and handlers.
pub mod routes;
/// Business logic on top of the store.
pub mod services;
/// Shared application state and sessions.
pub mod state;
