//! Client error types.
//!
//! The server reports failures through the `{"error": "..."}` envelope; the
//! client folds envelope, status code, and transport failures into one error
//! type. A 404 on a single-record lookup is not an error at all and surfaces
//! as `Ok(None)` from the lookup methods instead.

use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors a registry API client can produce.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered 404 for a record expected to exist.
    #[error("{message}")]
    NotFound {
        /// The envelope message, e.g. `Land not found`.
        message: String,
    },

    /// The server rejected the request as invalid (400).
    #[error("request rejected: {message}")]
    Rejected {
        /// The envelope message.
        message: String,
    },

    /// The server failed or answered an unexpected status.
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// The envelope message, or the raw body when there was no envelope.
        message: String,
    },

    /// The request never completed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected JSON shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// True when the error is a record miss rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::NotFound {
            message: "Land not found".to_string(),
        };
        assert_eq!(err.to_string(), "Land not found");
        assert!(err.is_not_found());

        let err = ClientError::Rejected {
            message: "unknown attribute 'flavor' for lands".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "request rejected: unknown attribute 'flavor' for lands"
        );
        assert!(!err.is_not_found());

        let err = ClientError::Server {
            status: 503,
            message: "storage unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "server error 503: storage unavailable");
    }
}
