//! Registry API route configuration.
//!
//! Defines all routes for the registry REST API.

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use manar_persistence::core::EntityStore;

use crate::handlers;
use crate::state::AppState;

/// Creates all registry REST API routes.
///
/// The `{entity}` segment is one of the catalog paths (`lands`,
/// `buildings`, `rentals`, `displacements`); handlers resolve it and
/// answer 404 for anything else.
///
/// # Routes
///
/// ## System-level
/// - `GET /api/health` - Health check
///
/// ## Collection-level
/// - `GET /api/{entity}` - List all records, newest first
/// - `POST /api/{entity}` - Create a record
/// - `POST /api/{entity}/search` - Filtered search
///
/// ## Record-level
/// - `GET /api/{entity}/{id}` - Read by id
/// - `PUT /api/{entity}/{id}` - Partial update
/// - `DELETE /api/{entity}/{id}` - Delete
///
/// ## Lookup and child collections
/// - `GET /api/{entity}/by-{key}/{value}` - Natural key lookup
/// - `GET /api/{entity}/{id}/{collection}` - List a child collection
/// - `POST /api/{entity}/{id}/{collection}` - Add to a child collection
///
/// The last three share one registered route; the router requires a
/// single parameter name per position, so the handlers tell the forms
/// apart from the segment values.
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: EntityStore + 'static,
{
    Router::new()
        // System-level routes
        .route("/api/health", get(handlers::health_handler::<S>))
        // Collection-level routes
        .route("/api/{entity}", get(handlers::list_handler::<S>))
        .route("/api/{entity}", post(handlers::create_handler::<S>))
        .route("/api/{entity}/search", post(handlers::search_handler::<S>))
        // Record-level routes
        .route("/api/{entity}/{id}", get(handlers::read_handler::<S>))
        .route("/api/{entity}/{id}", put(handlers::update_handler::<S>))
        .route("/api/{entity}/{id}", delete(handlers::delete_handler::<S>))
        // Natural key lookups and child collections
        .route(
            "/api/{entity}/{id}/{value}",
            get(handlers::lookup_handler::<S>),
        )
        .route(
            "/api/{entity}/{id}/{value}",
            post(handlers::child_create_handler::<S>),
        )
        // Everything else gets the JSON error envelope
        .fallback(handlers::route_fallback)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    // Route coverage lives in the integration tests
}
