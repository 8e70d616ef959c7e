//! Error types for the persistence layer.
//!
//! This module defines all error types used throughout the persistence layer,
//! following a hierarchy that separates entity state errors, validation errors,
//! and backend errors.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all store operations.
///
/// This enum encompasses all possible errors that can occur during persistence
/// operations, organized by category.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Entity state errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Filter and write validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to entity state.
#[derive(Error, Debug)]
pub enum EntityError {
    /// A single-record lookup matched zero rows.
    ///
    /// `entity` carries the display name so the message reads as the wire
    /// contract expects ("Land not found"). Distinct from an empty search
    /// result, which is not an error.
    #[error("{entity} not found")]
    NotFound { entity: String, key: String },

    /// The request named an entity type the catalog does not know.
    #[error("unknown entity type: {path}")]
    UnknownType { path: String },
}

/// Errors related to filter and write validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A filter or write used an attribute outside the entity's catalog.
    #[error("unknown attribute '{attribute}' for {entity}")]
    UnknownAttribute { entity: String, attribute: String },

    /// A supplied value does not match the attribute's declared type.
    #[error("invalid value for attribute '{attribute}': expected {expected}")]
    InvalidValue {
        attribute: String,
        expected: &'static str,
    },

    /// A create was missing an attribute the catalog marks required.
    #[error("missing required attribute '{attribute}' for {entity}")]
    MissingAttribute { entity: String, attribute: String },

    /// The request body was not a JSON object.
    #[error("invalid request body: {message}")]
    InvalidBody { message: String },
}

/// Errors originating from the database backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Connection pool exhausted.
    #[error("connection pool exhausted for {backend_name}")]
    PoolExhausted { backend_name: String },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationFailed { message: String },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryFailed { message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

impl BackendError {
    /// True for the connection-level failures that mean the store cannot be
    /// reached at all, as opposed to a statement it rejected.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            BackendError::Unavailable { .. }
                | BackendError::ConnectionFailed { .. }
                | BackendError::PoolExhausted { .. }
        )
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

// Implement conversions from common error types

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(BackendError::Serialization {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(BackendError::QueryFailed {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "sqlite")]
impl From<r2d2::Error> for StoreError {
    fn from(_err: r2d2::Error) -> Self {
        StoreError::Backend(BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_error_display() {
        let err = EntityError::NotFound {
            entity: "Land".to_string(),
            key: "42".to_string(),
        };
        assert_eq!(err.to_string(), "Land not found");

        let err = EntityError::UnknownType {
            path: "frogs".to_string(),
        };
        assert_eq!(err.to_string(), "unknown entity type: frogs");
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::UnknownAttribute {
            entity: "lands".to_string(),
            attribute: "flavor".to_string(),
        };
        assert_eq!(err.to_string(), "unknown attribute 'flavor' for lands");

        let err = ValidationError::InvalidValue {
            attribute: "classroomCount".to_string(),
            expected: "an integer value",
        };
        assert!(err.to_string().contains("classroomCount"));
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::QueryFailed {
            message: "no such table: lands".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "query execution failed: no such table: lands"
        );
    }

    #[test]
    fn test_backend_error_unavailable_classification() {
        let err = BackendError::PoolExhausted {
            backend_name: "sqlite".to_string(),
        };
        assert!(err.is_unavailable());

        let err = BackendError::QueryFailed {
            message: "syntax error".to_string(),
        };
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_store_error_from_categories() {
        let err: StoreError = EntityError::UnknownType {
            path: "frogs".to_string(),
        }
        .into();
        assert!(matches!(err, StoreError::Entity(_)));

        let err: StoreError = ValidationError::InvalidBody {
            message: "expected an object".to_string(),
        }
        .into();
        assert!(matches!(err, StoreError::Validation(_)));
    }
}
