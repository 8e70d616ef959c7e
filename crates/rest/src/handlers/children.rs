//! Child collection create handler.
//!
//! Implements `POST [base]/api/[entity]/[parent-id]/[collection]`, the
//! write half of the child collection surface. Reads go through the
//! lookup handler, which shares the same route shape.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manar_persistence::core::EntityStore;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::handlers::{parse_json_body, require_entity};
use crate::state::AppState;

/// Handler for adding a row to a child collection.
///
/// The parent must exist; creating under a missing parent is a 404 with
/// the parent's display name, unlike listing, which just returns an
/// empty array.
///
/// # HTTP Request
///
/// `POST [base]/api/[entity]/[parent-id]/[collection]`
///
/// # Response
///
/// - `201 Created` - The stored child row
/// - `400 Bad Request` - Malformed body or unknown attribute
/// - `404 Not Found` - Parent record missing, or no such collection
pub async fn child_create_handler<S>(
    State(state): State<AppState<S>>,
    Path((entity, selector, value)): Path<(String, String, String)>,
    body: Bytes,
) -> ApiResult<Response>
where
    S: EntityStore,
{
    let entity = require_entity(&entity)?;
    let Some(child) = entity.child(&value) else {
        return Err(ApiError::route_not_found());
    };
    let Ok(parent_id) = selector.parse::<i64>() else {
        return Err(ApiError::route_not_found());
    };
    let payload = parse_json_body(&body)?;

    debug!(
        entity = entity.path,
        collection = child.segment,
        parent_id,
        "Processing child create request"
    );

    let record = state
        .store()
        .create_child(entity, child, parent_id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(record)).into_response())
}
