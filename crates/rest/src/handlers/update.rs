//! Update handler.
//!
//! Implements the partial record update: `PUT [base]/api/[entity]/[id]`.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manar_persistence::core::EntityStore;
use tracing::debug;

use crate::error::ApiResult;
use crate::handlers::{parse_id, parse_json_body, require_entity};
use crate::state::AppState;

/// Handler for updating a record.
///
/// Partial semantics: attributes absent from the body keep their stored
/// values, an explicit `null` clears one. The response is the record as
/// stored after the update.
///
/// # HTTP Request
///
/// `PUT [base]/api/[entity]/[id]`
///
/// # Response
///
/// - `200 OK` - The updated record
/// - `400 Bad Request` - Malformed body or unknown attribute
/// - `404 Not Found` - No record with this id
pub async fn update_handler<S>(
    State(state): State<AppState<S>>,
    Path((entity, id)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Response>
where
    S: EntityStore,
{
    let entity = require_entity(&entity)?;
    let id = parse_id(&id)?;
    let payload = parse_json_body(&body)?;

    debug!(entity = entity.path, id, "Processing update request");

    let record = state.store().update(entity, id, &payload).await?;
    Ok((StatusCode::OK, Json(record)).into_response())
}
