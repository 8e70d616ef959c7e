//! # manar-client - Registry API Client
//!
//! This crate provides the consumer side of the Manar education facilities
//! registry: one [`EntityApiClient`] capability trait with two
//! implementations, selected by dependency injection at composition time.
//!
//! - [`HttpEntityClient`] talks to a running `manar-rest` server over HTTP.
//! - [`InMemoryEntityClient`] is a deterministic in-memory fake that mirrors
//!   the server's observable behavior (whitelist rejection, blank-value
//!   skipping, newest-first ordering, natural key lookup) without any I/O.
//!
//! Components take `&dyn EntityApiClient` (or a generic bound) and never name
//! a concrete implementation, so the same code runs against the fake in tests
//! and the real server in production.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use manar_client::{EntityApiClient, HttpEntityClient, ClientResult};
//! use manar_persistence::catalog::LANDS;
//! use manar_persistence::types::FilterSpec;
//! use serde_json::json;
//!
//! async fn cairo_lands(client: &dyn EntityApiClient) -> ClientResult<usize> {
//!     let mut filter = FilterSpec::new();
//!     filter.insert("governorate", json!("Cairo"))?;
//!     Ok(client.search(&LANDS, &filter).await?.len())
//! }
//!
//! # async fn run() -> ClientResult<()> {
//! let client = HttpEntityClient::new("http://localhost:3000")?;
//! let count = cairo_lands(&client).await?;
//! # Ok(())
//! # }
//! ```

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod http;
pub mod memory;

// Re-export commonly used types
pub use error::{ClientError, ClientResult};
pub use http::HttpEntityClient;
pub use memory::InMemoryEntityClient;

use async_trait::async_trait;
use manar_persistence::catalog::EntityConfig;
use manar_persistence::types::FilterSpec;
use serde_json::Value;

/// Capability trait for consumers of the registry API.
///
/// Records are plain JSON objects in the wire shape: the attributes of the
/// entity plus `id`, `createdAt`, and `updatedAt`.
#[async_trait]
pub trait EntityApiClient: Send + Sync {
    /// Lists every record of the entity, newest first.
    async fn list(&self, entity: &EntityConfig) -> ClientResult<Vec<Value>>;

    /// Searches with a sparse attribute filter.
    ///
    /// Filter attributes outside the entity's whitelist fail with
    /// [`ClientError::Rejected`]. A search that matches nothing succeeds with
    /// an empty vector.
    async fn search(
        &self,
        entity: &EntityConfig,
        filter: &FilterSpec,
    ) -> ClientResult<Vec<Value>>;

    /// Reads a record by id. `Ok(None)` when no record has the id.
    async fn find_by_id(&self, entity: &EntityConfig, id: i64) -> ClientResult<Option<Value>>;

    /// Looks a record up by its natural key. `Ok(None)` on a miss.
    async fn find_by_natural_key(
        &self,
        entity: &EntityConfig,
        key: &str,
    ) -> ClientResult<Option<Value>>;

    /// Creates a record, returning it as stored.
    async fn create(&self, entity: &EntityConfig, body: &Value) -> ClientResult<Value>;

    /// Applies a partial update: absent attributes keep their stored values,
    /// explicit `null` clears one.
    async fn update(&self, entity: &EntityConfig, id: i64, body: &Value) -> ClientResult<Value>;

    /// Deletes a record.
    async fn delete(&self, entity: &EntityConfig, id: i64) -> ClientResult<()>;

    /// Saves a record: update when the body carries an `id`, create otherwise.
    async fn save(&self, entity: &EntityConfig, body: &Value) -> ClientResult<Value> {
        match body.get("id").and_then(Value::as_i64) {
            Some(id) => self.update(entity, id, body).await,
            None => self.create(entity, body).await,
        }
    }
}
