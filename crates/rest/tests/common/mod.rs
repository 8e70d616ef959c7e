//! Common test utilities for REST API testing.

use std::sync::Arc;

use axum_test::TestServer;
use manar_persistence::backends::sqlite::SqliteBackend;
use manar_persistence::catalog::LANDS;
use manar_persistence::core::EntityStore;
use manar_rest::{AppState, ServerConfig};
use serde_json::json;

/// Creates a test server backed by a fresh in-memory database.
///
/// The backend is returned alongside the server so tests can seed records
/// directly.
pub fn create_test_server() -> (TestServer, Arc<SqliteBackend>) {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to init schema");
    let backend = Arc::new(backend);

    let config = ServerConfig::for_testing();
    let state = AppState::new(Arc::clone(&backend), config);
    let app = manar_rest::routing::api_routes::create_routes(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    (server, backend)
}

/// Seeds a land record directly through the backend, returning its id.
pub async fn seed_land(
    backend: &SqliteBackend,
    reference: &str,
    governorate: &str,
    usage_status: &str,
) -> i64 {
    let record = backend
        .create(
            &LANDS,
            &json!({
                "referenceNumber": reference,
                "governorate": governorate,
                "usageStatus": usage_status,
            }),
        )
        .await
        .expect("Failed to seed land");
    record.id()
}
