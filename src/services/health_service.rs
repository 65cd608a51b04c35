use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether the document store is usable, pinging the backend when one is installed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let store = state.store();
    match store.backend().await {
        Some(backend) => {
            if let Err(err) = backend.health_check().await {
                warn!(error = %err, "storage health check failed");
                return HealthResponse::degraded();
            }
        }
        None => {
            warn!("storage unavailable (no backend installed)");
            return HealthResponse::degraded();
        }
    }

    if store.is_ready() {
        HealthResponse::ok()
    } else {
        HealthResponse::degraded()
    }
}
