//! Deterministic in-memory registry client.
//!
//! [`InMemoryEntityClient`] mirrors the observable behavior of a real server
//! without any I/O: the same whitelist rejections, the same blank-value
//! skipping, the same newest-first ordering, the same natural key lookups.
//! Code written against [`EntityApiClient`](crate::EntityApiClient) behaves
//! the same under either implementation.
//!
//! Every instance owns its own records; two fakes never share state, and
//! [`reset`](InMemoryEntityClient::reset) returns one to its initial state
//! between test cases. Ids and timestamps are assigned deterministically, so
//! a test that creates the same records always sees the same output.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use manar_persistence::catalog::{AttributeDef, EntityConfig};
use manar_persistence::types::FilterSpec;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::EntityApiClient;
use crate::error::{ClientError, ClientResult};

/// Keys the registry assigns itself; tolerated and ignored in write bodies.
const MANAGED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// All fake timestamps count seconds from here: 2024-01-01T00:00:00Z.
const TIME_ORIGIN_EPOCH: i64 = 1_704_067_200;

fn stamp(tick: i64) -> String {
    let time = DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(TIME_ORIGIN_EPOCH + tick);
    time.to_rfc3339()
}

fn row_id(row: &Map<String, Value>) -> i64 {
    row.get("id").and_then(Value::as_i64).unwrap_or(0)
}

#[derive(Default)]
struct Registry {
    /// Rows per entity path, in creation order.
    tables: HashMap<&'static str, Vec<Map<String, Value>>>,
    next_id: i64,
    clock: i64,
}

impl Registry {
    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }
}

/// In-memory implementation of [`EntityApiClient`].
pub struct InMemoryEntityClient {
    registry: Mutex<Registry>,
}

impl Default for InMemoryEntityClient {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEntityClient {
    /// Creates an empty fake registry.
    pub fn new() -> Self {
        InMemoryEntityClient {
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Drops all records and restarts id and timestamp assignment.
    pub fn reset(&self) {
        *self.registry.lock() = Registry::default();
    }

    /// Number of records stored for an entity.
    pub fn len(&self, entity: &EntityConfig) -> usize {
        self.registry
            .lock()
            .tables
            .get(entity.path)
            .map_or(0, Vec::len)
    }

    /// True when no records are stored for an entity.
    pub fn is_empty(&self, entity: &EntityConfig) -> bool {
        self.len(entity) == 0
    }

    /// Validates a write body the way the server does, returning the
    /// normalized attribute values.
    fn collect_write(
        entity: &EntityConfig,
        body: &Value,
        is_create: bool,
    ) -> ClientResult<Map<String, Value>> {
        let Some(entries) = body.as_object() else {
            return Err(ClientError::Rejected {
                message: "invalid request body: expected a JSON object".to_string(),
            });
        };

        let mut values = Map::new();
        for (key, value) in entries {
            if MANAGED_KEYS.contains(&key.as_str()) {
                continue;
            }
            let Some(attribute) = entity.attribute(key) else {
                return Err(ClientError::Rejected {
                    message: format!("unknown attribute '{}' for {}", key, entity.path),
                });
            };
            if value.is_null() {
                if attribute.required {
                    return Err(missing_attribute(entity, attribute));
                }
                values.insert(key.clone(), Value::Null);
                continue;
            }
            let Some(normalized) = attribute.ty.normalize(value) else {
                return Err(ClientError::Rejected {
                    message: format!(
                        "invalid value for attribute '{}': expected {}",
                        attribute.name,
                        attribute.ty.expected()
                    ),
                });
            };
            values.insert(key.clone(), normalized);
        }

        if is_create {
            for attribute in entity.attributes {
                if attribute.required && !values.contains_key(attribute.name) {
                    return Err(missing_attribute(entity, attribute));
                }
            }
        }

        Ok(values)
    }
}

fn missing_attribute(entity: &EntityConfig, attribute: &AttributeDef) -> ClientError {
    ClientError::Rejected {
        message: format!(
            "missing required attribute '{}' for {}",
            attribute.name, entity.path
        ),
    }
}

fn record_not_found(entity: &EntityConfig) -> ClientError {
    ClientError::NotFound {
        message: format!("{} not found", entity.display_name),
    }
}

#[async_trait]
impl EntityApiClient for InMemoryEntityClient {
    async fn list(&self, entity: &EntityConfig) -> ClientResult<Vec<Value>> {
        self.search(entity, &FilterSpec::new()).await
    }

    async fn search(
        &self,
        entity: &EntityConfig,
        filter: &FilterSpec,
    ) -> ClientResult<Vec<Value>> {
        // The same whitelist walk the server performs
        let mut conditions: Vec<(&AttributeDef, Value)> = Vec::new();
        for (attribute, value) in filter.iter() {
            let Some(def) = entity.filterable_attribute(attribute) else {
                return Err(ClientError::Rejected {
                    message: format!("unknown attribute '{}' for {}", attribute, entity.path),
                });
            };
            let Some(normalized) = def.ty.normalize(value) else {
                return Err(ClientError::Rejected {
                    message: format!(
                        "invalid value for attribute '{}': expected {}",
                        def.name,
                        def.ty.expected()
                    ),
                });
            };
            conditions.push((def, normalized));
        }

        let registry = self.registry.lock();
        let Some(rows) = registry.tables.get(entity.path) else {
            return Ok(Vec::new());
        };

        // Rows sit in creation order; walking backwards is newest-first
        let mut records = Vec::new();
        for row in rows.iter().rev() {
            let matches = conditions
                .iter()
                .all(|(def, wanted)| row.get(def.name) == Some(wanted));
            if matches {
                records.push(Value::Object(row.clone()));
            }
        }
        Ok(records)
    }

    async fn find_by_id(&self, entity: &EntityConfig, id: i64) -> ClientResult<Option<Value>> {
        let registry = self.registry.lock();
        let record = registry
            .tables
            .get(entity.path)
            .and_then(|rows| rows.iter().find(|row| row_id(row) == id))
            .map(|row| Value::Object(row.clone()));
        Ok(record)
    }

    async fn find_by_natural_key(
        &self,
        entity: &EntityConfig,
        key: &str,
    ) -> ClientResult<Option<Value>> {
        let Some(natural_key) = entity.natural_key else {
            return Err(ClientError::Rejected {
                message: format!("{} has no natural key lookup", entity.path),
            });
        };

        let registry = self.registry.lock();
        let record = registry
            .tables
            .get(entity.path)
            .and_then(|rows| {
                rows.iter().find(|row| {
                    row.get(natural_key.attribute).and_then(Value::as_str) == Some(key)
                })
            })
            .map(|row| Value::Object(row.clone()));
        Ok(record)
    }

    async fn create(&self, entity: &EntityConfig, body: &Value) -> ClientResult<Value> {
        let values = Self::collect_write(entity, body, true)?;

        let mut registry = self.registry.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        let now = stamp(registry.tick());

        // The stored row carries every attribute, like a read-back row
        let mut row = Map::new();
        row.insert("id".to_string(), Value::from(id));
        for attribute in entity.attributes {
            let value = values.get(attribute.name).cloned().unwrap_or(Value::Null);
            row.insert(attribute.name.to_string(), value);
        }
        row.insert("createdAt".to_string(), Value::String(now.clone()));
        row.insert("updatedAt".to_string(), Value::String(now));

        registry
            .tables
            .entry(entity.path)
            .or_default()
            .push(row.clone());
        Ok(Value::Object(row))
    }

    async fn update(&self, entity: &EntityConfig, id: i64, body: &Value) -> ClientResult<Value> {
        let values = Self::collect_write(entity, body, false)?;

        let mut registry = self.registry.lock();
        let now = stamp(registry.tick());
        let Some(row) = registry
            .tables
            .get_mut(entity.path)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == id))
        else {
            return Err(record_not_found(entity));
        };

        for (key, value) in values {
            row.insert(key, value);
        }
        row.insert("updatedAt".to_string(), Value::String(now));
        Ok(Value::Object(row.clone()))
    }

    async fn delete(&self, entity: &EntityConfig, id: i64) -> ClientResult<()> {
        let mut registry = self.registry.lock();
        let Some(rows) = registry.tables.get_mut(entity.path) else {
            return Err(record_not_found(entity));
        };
        let before = rows.len();
        rows.retain(|row| row_id(row) != id);
        if rows.len() == before {
            return Err(record_not_found(entity));
        }
        Ok(())
    }
}
