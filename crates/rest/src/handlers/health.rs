//! Health check handler.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use manar_persistence::core::EntityStore;
use serde_json::json;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// Pings the storage backend; a backend that cannot be reached turns
/// into a `503 Service Unavailable`.
///
/// # HTTP Request
///
/// `GET [base]/api/health`
///
/// # Response
///
/// - `200 OK` - Backend reachable
/// - `503 Service Unavailable` - Backend down
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> ApiResult<Response>
where
    S: EntityStore,
{
    debug!("Processing health check request");

    state.store().health_check().await?;
    let body = json!({
        "status": "ok",
        "backend": state.store().backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    Ok((StatusCode::OK, Json(body)).into_response())
}
