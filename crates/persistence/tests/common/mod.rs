//! Common test utilities for the persistence integration tests.

use manar_persistence::backends::sqlite::SqliteBackend;

/// Creates a fresh in-memory backend with the schema applied.
pub fn create_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}
