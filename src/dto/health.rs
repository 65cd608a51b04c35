use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// True when the document store can serve requests.
    pub store_ready: bool,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            store_ready: true,
        }
    }

    /// Create a health response indicating the document store is unusable.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            store_ready: false,
        }
    }
}
