//! Search handlers.
//!
//! Implements the entity search operation: `POST [base]/api/[entity]/search`,
//! plus the full-collection listing `GET [base]/api/[entity]`, which is the
//! same search with the empty filter.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manar_persistence::core::EntityStore;
use manar_persistence::types::FilterSpec;
use tracing::debug;

use crate::error::ApiResult;
use crate::handlers::{parse_json_body, require_entity};
use crate::state::AppState;

/// Handler for the search operation.
///
/// Accepts a sparse filter object and returns every matching record, newest
/// first. Attributes the filter leaves out do not constrain the result;
/// attributes outside the entity's whitelist fail the request.
///
/// # HTTP Request
///
/// `POST [base]/api/[entity]/search`
///
/// # Response
///
/// - `200 OK` - JSON array of matching records (possibly empty)
/// - `400 Bad Request` - Malformed body or filter attribute rejected
/// - `404 Not Found` - Unknown entity collection
///
/// # Example
///
/// ```http
/// POST /api/lands/search HTTP/1.1
/// Content-Type: application/json
///
/// {"governorate": "Cairo", "usageStatus": ""}
/// ```
pub async fn search_handler<S>(
    State(state): State<AppState<S>>,
    Path(entity): Path<String>,
    body: Bytes,
) -> ApiResult<Response>
where
    S: EntityStore,
{
    let entity = require_entity(&entity)?;

    // An absent body is the empty filter
    let payload = parse_json_body(&body)?;
    let filter = FilterSpec::from_json(&payload)?;

    debug!(
        entity = entity.path,
        attributes = filter.len(),
        "Processing search request"
    );

    let records = state.store().search(entity, &filter).await?;
    Ok((StatusCode::OK, Json(records)).into_response())
}

/// Handler for the full-collection listing.
///
/// Equivalent to a search with the empty filter: every record of the entity,
/// newest first.
///
/// # HTTP Request
///
/// `GET [base]/api/[entity]`
pub async fn list_handler<S>(
    State(state): State<AppState<S>>,
    Path(entity): Path<String>,
) -> ApiResult<Response>
where
    S: EntityStore,
{
    let entity = require_entity(&entity)?;

    debug!(entity = entity.path, "Processing list request");

    let records = state.store().search(entity, &FilterSpec::new()).await?;
    Ok((StatusCode::OK, Json(records)).into_response())
}
