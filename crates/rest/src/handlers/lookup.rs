//! Natural key and child collection lookups.
//!
//! Both live on the same URL shape, `GET [base]/api/[entity]/[a]/[b]`:
//!
//! - `[a]` is the entity's `by-*` segment and `[b]` the key value, e.g.
//!   `/api/lands/by-reference/LND-2024-0001`
//! - `[a]` is a record id and `[b]` a child collection segment, e.g.
//!   `/api/lands/17/coordinates`
//!
//! Anything else under this shape is an unknown route.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manar_persistence::core::EntityStore;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::handlers::{record_not_found, require_entity};
use crate::state::AppState;

/// Handler for natural key lookups and child collection listings.
///
/// # Response
///
/// - `200 OK` - The record (natural key) or a JSON array (children; empty
///   when the parent is missing, since a listing is a search)
/// - `404 Not Found` - Key value matched nothing, or the URL shape matched
///   neither form
pub async fn lookup_handler<S>(
    State(state): State<AppState<S>>,
    Path((entity, selector, value)): Path<(String, String, String)>,
) -> ApiResult<Response>
where
    S: EntityStore,
{
    let entity = require_entity(&entity)?;

    // Natural key form: the selector is the entity's by-* segment. Segments
    // of other entities fall through to the unknown-route 404.
    if let Some(natural_key) = entity.natural_key {
        if selector == natural_key.segment {
            debug!(
                entity = entity.path,
                key = %value,
                "Processing natural key lookup"
            );
            return match state.store().find_by_natural_key(entity, &value).await? {
                Some(record) => Ok((StatusCode::OK, Json(record)).into_response()),
                None => Err(record_not_found(entity)),
            };
        }
    }

    // Child listing form: the selector is a record id and the value names a
    // child collection.
    if let Some(child) = entity.child(&value) {
        if let Ok(parent_id) = selector.parse::<i64>() {
            debug!(
                entity = entity.path,
                collection = child.segment,
                parent_id,
                "Processing child listing request"
            );
            let records = state.store().list_children(entity, child, parent_id).await?;
            return Ok((StatusCode::OK, Json(records)).into_response());
        }
    }

    Err(ApiError::route_not_found())
}
