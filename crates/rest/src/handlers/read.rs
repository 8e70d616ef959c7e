//! Read handler.
//!
//! Implements the single-record read: `GET [base]/api/[entity]/[id]`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manar_persistence::core::EntityStore;
use tracing::debug;

use crate::error::ApiResult;
use crate::handlers::{parse_id, record_not_found, require_entity};
use crate::state::AppState;

/// Handler for reading one record by id.
///
/// # HTTP Request
///
/// `GET [base]/api/[entity]/[id]`
///
/// # Response
///
/// - `200 OK` - The record
/// - `400 Bad Request` - The id segment is not an integer
/// - `404 Not Found` - No record with this id; the envelope carries the
///   entity's display name, e.g. `{"error": "Land not found"}`
pub async fn read_handler<S>(
    State(state): State<AppState<S>>,
    Path((entity, id)): Path<(String, String)>,
) -> ApiResult<Response>
where
    S: EntityStore,
{
    let entity = require_entity(&entity)?;
    let id = parse_id(&id)?;

    debug!(entity = entity.path, id, "Processing read request");

    match state.store().find_by_id(entity, id).await? {
        Some(record) => Ok((StatusCode::OK, Json(record)).into_response()),
        None => Err(record_not_found(entity)),
    }
}
