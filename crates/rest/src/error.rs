//! Error types for the registry REST API.
//!
//! This module defines the API error type and its conversion from persistence
//! errors. Every failure leaves the server as a JSON envelope of the form
//! `{"error": "<message>"}`.
//!
//! # Error Mapping
//!
//! Store errors from the persistence layer are mapped to HTTP status codes:
//!
//! | Store Error | HTTP Status |
//! |-------------|-------------|
//! | EntityError::NotFound | 404 |
//! | EntityError::UnknownType | 404 |
//! | ValidationError (any) | 400 |
//! | BackendError (unavailable) | 503 |
//! | BackendError (other) | 500 |
//!
//! A missing record is part of normal operation and is never logged as an
//! error; backend failures are logged at error level before the response is
//! built. Query failure detail stays out of responses in release builds.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manar_persistence::error::{BackendError, EntityError, StoreError, ValidationError};
use std::fmt;
use tracing::{debug, error};

/// The primary error type for REST API operations.
///
/// Each variant carries the message that goes out in the error envelope.
#[derive(Debug)]
pub enum ApiError {
    /// No record or route matched (HTTP 404).
    NotFound {
        /// Error message.
        message: String,
    },

    /// The request was malformed or failed validation (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// The storage backend cannot be reached (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// The request was valid but the server failed it (HTTP 500).
    Internal {
        /// Error message.
        message: String,
    },
}

impl ApiError {
    /// The HTTP status this error responds with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message carried in the error envelope.
    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound { message }
            | ApiError::BadRequest { message }
            | ApiError::ServiceUnavailable { message }
            | ApiError::Internal { message } => message,
        }
    }

    /// The 404 used for paths that resolve to no route, including unknown
    /// entity collections.
    pub fn route_not_found() -> Self {
        ApiError::NotFound {
            message: "Route not found".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound { message } => write!(f, "Not found: {}", message),
            ApiError::BadRequest { message } => write!(f, "Bad request: {}", message),
            ApiError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            ApiError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({ "error": self.message() });
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Entity(e) => e.into(),
            StoreError::Validation(e) => e.into(),
            StoreError::Backend(e) => e.into(),
        }
    }
}

impl From<EntityError> for ApiError {
    fn from(err: EntityError) -> Self {
        // Missing records are routine; keep them off the error log
        debug!(error = %err, "entity lookup failed");
        match err {
            EntityError::NotFound { .. } => ApiError::NotFound {
                message: err.to_string(),
            },
            EntityError::UnknownType { .. } => ApiError::route_not_found(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        debug!(error = %err, "request rejected");
        ApiError::BadRequest {
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        error!(error = %err, "storage operation failed");
        if err.is_unavailable() {
            ApiError::ServiceUnavailable {
                message: "storage unavailable".to_string(),
            }
        } else {
            // Release builds keep statement-level detail out of responses
            let message = if cfg!(debug_assertions) {
                err.to_string()
            } else {
                "storage query failed".to_string()
            };
            ApiError::Internal { message }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest {
            message: format!("invalid JSON body: {}", err),
        }
    }
}

/// Result type alias for REST operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ApiError::NotFound {
            message: "Land not found".to_string(),
        };
        assert_eq!(err.to_string(), "Not found: Land not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Land not found");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = StoreError::Entity(EntityError::NotFound {
            entity: "Building".to_string(),
            key: "7".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Building not found");
    }

    #[test]
    fn test_unknown_type_maps_to_route_not_found() {
        let err: ApiError = StoreError::Entity(EntityError::UnknownType {
            path: "frogs".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Route not found");
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err: ApiError = StoreError::Validation(ValidationError::UnknownAttribute {
            entity: "lands".to_string(),
            attribute: "flavor".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "unknown attribute 'flavor' for lands");
    }

    #[test]
    fn test_unavailable_maps_to_503_without_detail() {
        let err: ApiError = StoreError::Backend(BackendError::ConnectionFailed {
            backend_name: "sqlite".to_string(),
            message: "/data/manar.db is on a dead disk".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message(), "storage unavailable");
    }

    #[test]
    fn test_query_failure_maps_to_500() {
        let err: ApiError = StoreError::Backend(BackendError::QueryFailed {
            message: "no such table: lands".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        if cfg!(debug_assertions) {
            assert!(err.message().contains("no such table"));
        } else {
            assert_eq!(err.message(), "storage query failed");
        }
    }

    #[test]
    fn test_invalid_json_maps_to_400() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: ApiError = parse_err.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().starts_with("invalid JSON body"));
    }
}
