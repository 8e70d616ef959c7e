//! Delete handler.
//!
//! Implements record deletion: `DELETE [base]/api/[entity]/[id]`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manar_persistence::core::EntityStore;
use serde_json::json;
use tracing::debug;

use crate::error::ApiResult;
use crate::handlers::{parse_id, require_entity};
use crate::state::AppState;

/// Handler for deleting a record.
///
/// Child rows (coordinates, decisions) are removed along with their
/// parent.
///
/// # HTTP Request
///
/// `DELETE [base]/api/[entity]/[id]`
///
/// # Response
///
/// - `200 OK` - Confirmation message
/// - `404 Not Found` - No record with this id
pub async fn delete_handler<S>(
    State(state): State<AppState<S>>,
    Path((entity, id)): Path<(String, String)>,
) -> ApiResult<Response>
where
    S: EntityStore,
{
    let entity = require_entity(&entity)?;
    let id = parse_id(&id)?;

    debug!(entity = entity.path, id, "Processing delete request");

    state.store().delete(entity, id).await?;
    let body = json!({
        "message": format!("{} deleted successfully", entity.display_name)
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}
