use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    dao::{deals::DealsError, storage::StoreError},
    state::moderation::InvalidTransition,
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Payload does not satisfy the collection schema.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// A uniqueness rule would be broken.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Missing session, or acting on somebody else's content.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Document store is not connected or the backend call failed.
    #[error("storage unavailable")]
    Unavailable(#[source] StoreError),
    /// The deals API failed.
    #[error("deals API error")]
    Upstream(#[source] DealsError),
    /// Stored data no longer matches its typed shape.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation { errors, .. } => ServiceError::Validation(errors),
            StoreError::UnknownCollection(name) => {
                ServiceError::NotFound(format!("collection `{name}`"))
            }
            StoreError::NotFound { collection, id } => {
                ServiceError::NotFound(format!("{collection} `{id}`"))
            }
            err @ (StoreError::Unavailable(_) | StoreError::NotReady) => {
                ServiceError::Unavailable(err)
            }
            err @ (StoreError::Decode { .. } | StoreError::Encode { .. }) => {
                ServiceError::Internal(err.to_string())
            }
        }
    }
}

impl From<DealsError> for ServiceError {
    fn from(err: DealsError) -> Self {
        match err {
            DealsError::UnknownGame(id) => ServiceError::NotFound(format!("deals game `{id}`")),
            other => ServiceError::Upstream(other),
        }
    }
}

impl From<InvalidTransition> for ServiceError {
    fn from(err: InvalidTransition) -> Self {
        ServiceError::InvalidState(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Unauthorized access attempt.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// An upstream API misbehaved.
    #[error("bad gateway: {0}")]
    BadGateway(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::Validation(errors) => AppError::from(errors),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Conflict(message) => AppError::Conflict(message),
            ServiceError::Unauthorized(message) => AppError::Unauthorized(message),
            ServiceError::InvalidState(message) => AppError::Conflict(message),
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Upstream(source) => AppError::BadGateway(source.to_string()),
            ServiceError::Internal(message) => AppError::Internal(message),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    /// HTTP status the error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::dao::storage::{NoBackend, StorageError};
    use crate::state::moderation::{ModerationEvent, ModerationStatus};

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).status()
    }

    #[test]
    fn store_errors_map_to_http_statuses() {
        let missing = StoreError::NotFound {
            collection: "games",
            id: Uuid::new_v4(),
        };
        assert_eq!(status_of(missing.into()), StatusCode::NOT_FOUND);

        let unknown = StoreError::UnknownCollection("widgets".into());
        assert_eq!(status_of(unknown.into()), StatusCode::NOT_FOUND);

        let down = StoreError::Unavailable(StorageError::unavailable("down".into(), NoBackend));
        assert_eq!(status_of(down.into()), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(StoreError::NotReady.into()),
            StatusCode::SERVICE_UNAVAILABLE
        );

        let invalid = StoreError::Validation {
            collection: "users",
            errors: ValidationErrors::new(),
        };
        assert_eq!(status_of(invalid.into()), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn domain_errors_map_to_http_statuses() {
        assert_eq!(
            status_of(ServiceError::Conflict("taken".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ServiceError::Unauthorized("no session".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ServiceError::InvalidInput("rating".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DealsError::UnknownGame("9".into()).into()),
            StatusCode::NOT_FOUND
        );

        let refused = ModerationStatus::Rejected
            .apply(ModerationEvent::Flag)
            .unwrap_err();
        assert_eq!(status_of(refused.into()), StatusCode::CONFLICT);
    }
}
