//! Create handler.
//!
//! Implements record creation: `POST [base]/api/[entity]`.

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
use crate::handlers::{parse_json_body, require_entity};
use crate::state::AppState;

/// Handler for creating a record.
///
/// The body is a JSON object of catalog attributes. The server assigns the
/// id and the timestamps; unknown attributes fail the request rather than
/// being dropped.
///
/// # HTTP Request
///
/// `POST [base]/api/[entity]`
///
/// # Response
///
/// - `201 Created` - The record as stored
/// - `400 Bad Request` - Malformed body, unknown attribute, or a missing
///   required attribute
/// - `404 Not Found` - Unknown entity collection
///
/// # Example
///
/// ```http
/// POST /api/lands HTTP/1.1
/// Content-Type: application/json
///
/// {"referenceNumber": "LND-2024-0001", "governorate": "Cairo"}
/// ```
pub async fn create_handler<S>(
    State(state): State<AppState<S>>,
    Path(entity): Path<String>,
    body: Bytes,
) -> ApiResult<Response>
where
    S: EntityStore,
{
    let entity = require_entity(&entity)?;
    let payload = parse_json_body(&body)?;

    debug!(entity = entity.path, "Processing create request");

    let record = state.store().create(entity, &payload).await?;

    debug!(entity = entity.path, id = record.id(), "Record created");
    Ok((StatusCode::CREATED, Json(record)).into_response())
}
