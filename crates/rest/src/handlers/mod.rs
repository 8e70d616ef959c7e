//! HTTP request handlers for the registry API.
//!
//! This module contains handlers for every wire operation:
//!
//! - [`search`] - Filtered search and full collection listing
//! - [`read`] - Read a record by id
//! - [`lookup`] - Natural key lookup and child collection listing
//! - [`create`] - Create a record
//! - [`update`] - Update a record
//! - [`delete`] - Delete a record
//! - [`children`] - Add to a child collection
//! - [`health`] - Health check endpoint
//!
//! Handlers resolve the `{entity}` path segment against the catalog
//! themselves; a segment the catalog does not know is an unknown route, not a
//! bad request.

pub mod children;
pub mod create;
pub mod delete;
pub mod health;
pub mod lookup;
pub mod read;
pub mod search;
pub mod update;

// Re-export handlers for convenience
pub use children::child_create_handler;
pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use lookup::lookup_handler;
pub use read::read_handler;
pub use search::{list_handler, search_handler};
pub use update::update_handler;

use axum::{Json, body::Bytes, http::StatusCode, response::IntoResponse};
use manar_persistence::catalog::{EntityConfig, entity_by_path};
use serde_json::Value;

use crate::error::ApiError;

/// Resolves the `{entity}` path segment against the catalog.
pub(crate) fn require_entity(path: &str) -> Result<&'static EntityConfig, ApiError> {
    entity_by_path(path).ok_or_else(ApiError::route_not_found)
}

/// Parses the `{id}` path segment.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| ApiError::BadRequest {
        message: format!("invalid record id '{}'", raw),
    })
}

/// Parses a request body into JSON, treating the empty body as `null`.
pub(crate) fn parse_json_body(body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(body)?)
}

/// The 404 used for not-found records: `{"error": "<Display name> not found"}`.
pub(crate) fn record_not_found(entity: &EntityConfig) -> ApiError {
    ApiError::NotFound {
        message: format!("{} not found", entity.display_name),
    }
}

/// Fallback for paths no route matched.
pub async fn route_fallback() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Route not found" })),
    )
}
