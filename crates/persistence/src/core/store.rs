//! The entity store trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::{ChildCollectionDef, EntityConfig};
use crate::error::StoreResult;
use crate::types::{EntityRecord, FilterSpec};

/// Catalog-driven storage for entity records.
///
/// One implementation serves every entity family; the catalog entry passed to
/// each method decides the table, the whitelist, and the ordering. All methods
/// take a connection from the backend's pool for the duration of the call and
/// release it on every exit path. No method retries.
///
/// # Example
///
/// ```no_run
/// use manar_persistence::catalog::LANDS;
/// use manar_persistence::core::EntityStore;
/// use manar_persistence::error::StoreResult;
/// use manar_persistence::types::FilterSpec;
/// use serde_json::json;
///
/// async fn newest_cairo_land<S: EntityStore>(store: &S) -> StoreResult<Option<i64>> {
///     let filter = FilterSpec::from_json(&json!({"governorate": "Cairo"}))?;
///     let records = store.search(&LANDS, &filter).await?;
///     Ok(records.first().map(|r| r.id()))
/// }
/// ```
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Probes whether the backend can be reached.
    async fn health_check(&self) -> StoreResult<()>;

    /// Runs a filtered search over an entity table.
    ///
    /// The filter is validated against the entity's whitelist, folded into an
    /// AND conjunction of equality predicates, and rendered through the fixed
    /// statement builder. The empty filter returns every row. Results always
    /// come back in the entity's fixed order; two identical searches return
    /// identically ordered results.
    ///
    /// # Errors
    ///
    /// * `StoreError::Validation` - A filter attribute is outside the
    ///   whitelist or its value has the wrong type
    /// * `StoreError::Backend` - The connection could not be acquired or the
    ///   statement failed
    async fn search(
        &self,
        entity: &EntityConfig,
        filter: &FilterSpec,
    ) -> StoreResult<Vec<EntityRecord>>;

    /// Reads one record by row id.
    ///
    /// Returns `Ok(None)` when no row matches; the caller decides whether
    /// that is a not-found error.
    async fn find_by_id(
        &self,
        entity: &EntityConfig,
        id: i64,
    ) -> StoreResult<Option<EntityRecord>>;

    /// Reads one record by its natural key value.
    ///
    /// The degenerate one-predicate search: at most one row matches because
    /// natural keys are unique. Returns `Ok(None)` for entities without a
    /// natural key.
    async fn find_by_natural_key(
        &self,
        entity: &EntityConfig,
        value: &str,
    ) -> StoreResult<Option<EntityRecord>>;

    /// Creates a record and returns it as stored.
    ///
    /// The body is validated against the catalog: unknown attributes are
    /// rejected, required attributes must be present, and the server-managed
    /// keys (`id`, `createdAt`, `updatedAt`) are ignored. The returned record
    /// is re-read from the store, so a search issued after this resolves sees
    /// the row.
    ///
    /// # Errors
    ///
    /// * `StoreError::Validation` - Unknown attribute, bad value type, or a
    ///   missing required attribute
    /// * `StoreError::Backend` - Statement failure, including natural-key
    ///   uniqueness violations
    async fn create(&self, entity: &EntityConfig, body: &Value) -> StoreResult<EntityRecord>;

    /// Updates the supplied attributes of one record and returns it as
    /// stored.
    ///
    /// Partial semantics: attributes absent from the body keep their values;
    /// an explicit `null` clears one. `updated_at` is always re-stamped.
    ///
    /// # Errors
    ///
    /// * `StoreError::Entity(NotFound)` - No row with this id
    /// * `StoreError::Validation` - Unknown attribute or bad value type
    async fn update(
        &self,
        entity: &EntityConfig,
        id: i64,
        body: &Value,
    ) -> StoreResult<EntityRecord>;

    /// Deletes one record and its child collections.
    ///
    /// # Errors
    ///
    /// * `StoreError::Entity(NotFound)` - No row with this id
    async fn delete(&self, entity: &EntityConfig, id: i64) -> StoreResult<()>;

    /// Lists a child collection of one parent row, in the collection's fixed
    /// order.
    ///
    /// A missing parent lists as empty; listing is a search, and an empty
    /// search result is not an error.
    async fn list_children(
        &self,
        entity: &EntityConfig,
        child: &ChildCollectionDef,
        parent_id: i64,
    ) -> StoreResult<Vec<EntityRecord>>;

    /// Adds a row to a child collection.
    ///
    /// # Errors
    ///
    /// * `StoreError::Entity(NotFound)` - The parent row does not exist
    /// * `StoreError::Validation` - Unknown attribute, bad value type, or a
    ///   missing required attribute
    async fn create_child(
        &self,
        entity: &EntityConfig,
        child: &ChildCollectionDef,
        parent_id: i64,
        body: &Value,
    ) -> StoreResult<EntityRecord>;

    /// Counts the rows of an entity table.
    async fn count(&self, entity: &EntityConfig) -> StoreResult<u64>;
}
