//! # manar-rest - Registry REST API Implementation
//!
//! This crate provides the HTTP surface of the Manar education facilities
//! registry. It exposes a uniform JSON API over every catalog entity:
//! filtered search, CRUD, natural key lookup, and child collections, all
//! driven by the shared entity catalog in `manar-persistence`.
//!
//! ## Features
//!
//! - **Uniform Entity API**: One set of routes serves lands, buildings,
//!   rental buildings, and displacement records
//! - **Filtered Search**: Conjunctive attribute filters with a fixed
//!   newest-first ordering
//! - **Natural Key Lookup**: `by-reference`, `by-number`, `by-id-number`
//!   style lookups per entity
//! - **Child Collections**: Land coordinates and rental decisions nested
//!   under their parent record
//! - **JSON Error Envelope**: Every failure answers `{"error": "..."}` with
//!   the matching HTTP status
//!
//! ## Backend Support
//!
//! Storage backends are configured through feature flags:
//!
//! - `sqlite` - SQLite backend (default)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use manar_rest::{create_app, ServerConfig};
//! use manar_persistence::backends::sqlite::SqliteBackend;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Create a storage backend
//!     let backend = SqliteBackend::new("manar.db")?;
//!     backend.init_schema()?;
//!
//!     // Create the Axum application
//!     let app = create_app(backend);
//!
//!     // Start the server
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! The server exposes the following endpoints:
//!
//! | Operation | HTTP Method | URL Pattern |
//! |-----------|-------------|-------------|
//! | search | POST | `/api/[entity]/search` |
//! | list | GET | `/api/[entity]` |
//! | read | GET | `/api/[entity]/[id]` |
//! | lookup | GET | `/api/[entity]/by-[key]/[value]` |
//! | create | POST | `/api/[entity]` |
//! | update | PUT | `/api/[entity]/[id]` |
//! | delete | DELETE | `/api/[entity]/[id]` |
//! | list children | GET | `/api/[entity]/[id]/[collection]` |
//! | create child | POST | `/api/[entity]/[id]/[collection]` |
//! | health | GET | `/api/health` |
//!
//! ## Error Handling
//!
//! All errors are returned as a JSON envelope `{"error": "<message>"}` with
//! the appropriate HTTP status code:
//!
//! | HTTP Status | Condition |
//! |-------------|-----------|
//! | 400 | Malformed body, unknown attribute, invalid value |
//! | 404 | Record not found, unknown entity or route |
//! | 500 | Storage query failure |
//! | 503 | Storage backend unavailable |
//!
//! ## Configuration
//!
//! The server is configured via environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MANAR_SERVER_PORT` | 3000 | Server port |
//! | `MANAR_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `MANAR_LOG_LEVEL` | info | Log level (error, warn, info, debug, trace) |
//! | `MANAR_MAX_BODY_SIZE` | 10485760 | Max request body size (bytes) |
//! | `MANAR_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `MANAR_ENABLE_CORS` | true | Enable CORS |
//! | `MANAR_CORS_ORIGINS` | * | Allowed CORS origins |
//! | `MANAR_DATABASE_URL` | manar.db | SQLite database path |
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`error`] - Error types and the JSON error envelope
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration)
//! - [`handlers`] - HTTP request handlers for each operation
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use manar_persistence::core::EntityStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// This is a convenience function that creates the app with default settings.
/// For more control, use [`create_app_with_config`].
///
/// # Arguments
///
/// * `storage` - The storage backend to use
///
/// # Example
///
/// ```rust,ignore
/// use manar_rest::create_app;
/// use manar_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let app = create_app(backend);
/// ```
pub fn create_app<S>(storage: S) -> Router
where
    S: EntityStore + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// This function sets up the complete registry REST API with all handlers,
/// middleware, and configuration.
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust,ignore
/// use manar_rest::{create_app_with_config, ServerConfig};
/// use manar_persistence::backends::sqlite::SqliteBackend;
///
/// let backend = SqliteBackend::in_memory()?;
/// let config = ServerConfig {
///     port: 3000,
///     enable_cors: true,
///     ..Default::default()
/// };
/// let app = create_app_with_config(backend, config);
/// ```
pub fn create_app_with_config<S>(storage: S, config: ServerConfig) -> Router
where
    S: EntityStore + 'static,
{
    info!(
        "Creating REST API server with backend: {}",
        storage.backend_name()
    );

    // Create application state
    let state = AppState::new(Arc::new(storage), config.clone());

    // Build the router with all registry routes
    let router = routing::api_routes::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Cap request bodies
    let router = router.layer(DefaultBodyLimit::max(config.max_body_size));

    // Add CORS if enabled
    let router = if config.enable_cors {
        let cors = build_cors_layer(&config);
        router.layer(cors)
    } else {
        router
    };

    // Apply remaining middleware
    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    // Configure origins
    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    // Configure methods
    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    // Configure headers
    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "manar_rest={level},manar_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
