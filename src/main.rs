//! GameHub Local binary entrypoint wiring the REST API, the document store and its supervisor.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gamehub_local::{
    config::{AppConfig, StoreBackend},
    dao::{
        deals::DealsClient,
        document_store::{DocumentBackend, memory::MemoryBackend},
        store::DocumentStore,
    },
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let deals = DealsClient::new(&config.deals_api_url).context("building deals API client")?;
    let store = DocumentStore::new();
    start_storage(config.store_backend, store.clone()).await?;

    let port = config.port;
    let app_state = AppState::new(config, store, deals);
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Install the memory backend directly, or spawn the supervisor that connects
/// to CouchDB / MongoDB in the background and flips store readiness.
async fn start_storage(backend: StoreBackend, store: DocumentStore) -> anyhow::Result<()> {
    info!(%backend, "configuring document store backend");
    match backend {
        StoreBackend::Memory => {
            store.install_backend(Arc::new(MemoryBackend::new())).await;
        }
        #[cfg(feature = "couch-store")]
        StoreBackend::Couch => {
            use gamehub_local::dao::document_store::couchdb::{CouchConfig, CouchDocumentStore};

            let config = CouchConfig::from_env().context("reading CouchDB settings")?;
            tokio::spawn(gamehub_local::services::storage_supervisor::run(
                store,
                move || {
                    let config = config.clone();
                    async move {
                        let backend = CouchDocumentStore::connect(config).await?;
                        Ok(Arc::new(backend) as Arc<dyn DocumentBackend>)
                    }
                },
            ));
        }
        #[cfg(feature = "mongo-store")]
        StoreBackend::Mongo => {
            use gamehub_local::dao::document_store::mongodb::{MongoConfig, MongoDocumentStore};

            let config = MongoConfig::from_env()
                .await
                .context("reading MongoDB settings")?;
            tokio::spawn(gamehub_local::services::storage_supervisor::run(
                store,
                move || {
                    let config = config.clone();
                    async move {
                        let backend = MongoDocumentStore::connect(config).await?;
                        Ok(Arc::new(backend) as Arc<dyn DocumentBackend>)
                    }
                },
            ));
        }
        #[allow(unreachable_patterns)]
        other => anyhow::bail!("store backend `{other}` is not compiled into this binary"),
    }
    Ok(())
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "SIGTERM handler unavailable; waiting for Ctrl+C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
