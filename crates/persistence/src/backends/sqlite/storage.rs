//! EntityStore implementation for SQLite.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, Row, params, params_from_iter};
use serde_json::{Map, Number, Value};
use tracing::debug;

use crate::catalog::{AttributeDef, AttributeType, ChildCollectionDef, EntityConfig};
use crate::core::EntityStore;
use crate::error::{BackendError, EntityError, StoreError, StoreResult, ValidationError};
use crate::search::{
    BindValue, Predicate, bind_for_attribute, build_child_lookup, build_child_search, build_delete,
    build_insert, build_predicates, build_search, build_update,
};
use crate::types::{EntityRecord, FilterSpec};

use super::SqliteBackend;

fn query_error(message: String) -> StoreError {
    StoreError::Backend(BackendError::QueryFailed { message })
}

fn not_found(entity: &EntityConfig, id: i64) -> StoreError {
    StoreError::Entity(EntityError::NotFound {
        entity: entity.display_name.to_string(),
        key: id.to_string(),
    })
}

/// Reads one projected attribute column as a JSON value, mapping SQL NULL to
/// JSON null.
fn attribute_value(row: &Row<'_>, index: usize, ty: AttributeType) -> rusqlite::Result<Value> {
    let value = match ty {
        AttributeType::Text | AttributeType::Date => row
            .get::<_, Option<String>>(index)?
            .map(Value::String)
            .unwrap_or(Value::Null),
        AttributeType::Integer => row
            .get::<_, Option<i64>>(index)?
            .map(Value::from)
            .unwrap_or(Value::Null),
        AttributeType::Float => row
            .get::<_, Option<f64>>(index)?
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        AttributeType::Boolean => row
            .get::<_, Option<i64>>(index)?
            .map(|flag| Value::Bool(flag != 0))
            .unwrap_or(Value::Null),
    };
    Ok(value)
}

/// Rebuilds an [`EntityRecord`] from a row projected by
/// [`build_search`](crate::search::build_search). Column order there is fixed:
/// id, the catalog attributes, created_at, updated_at.
fn entity_from_row(entity: &EntityConfig, row: &Row<'_>) -> rusqlite::Result<EntityRecord> {
    let id: i64 = row.get(0)?;
    let mut body = Map::new();
    body.insert("id".to_string(), Value::from(id));
    for (offset, attr) in entity.attributes.iter().enumerate() {
        body.insert(
            attr.name.to_string(),
            attribute_value(row, offset + 1, attr.ty)?,
        );
    }
    let created_at: String = row.get(entity.attributes.len() + 1)?;
    let updated_at: String = row.get(entity.attributes.len() + 2)?;
    body.insert("createdAt".to_string(), Value::String(created_at));
    body.insert("updatedAt".to_string(), Value::String(updated_at));
    Ok(EntityRecord::new(id, Value::Object(body)))
}

/// Rebuilds a child record from a row projected by
/// [`build_child_search`](crate::search::build_child_search): id, the parent
/// reference, the collection attributes, created_at.
fn child_from_row(child: &ChildCollectionDef, row: &Row<'_>) -> rusqlite::Result<EntityRecord> {
    let id: i64 = row.get(0)?;
    let parent_id: i64 = row.get(1)?;
    let mut body = Map::new();
    body.insert("id".to_string(), Value::from(id));
    body.insert(child.parent_attribute.to_string(), Value::from(parent_id));
    for (offset, attr) in child.attributes.iter().enumerate() {
        body.insert(
            attr.name.to_string(),
            attribute_value(row, offset + 2, attr.ty)?,
        );
    }
    let created_at: String = row.get(child.attributes.len() + 2)?;
    body.insert("createdAt".to_string(), Value::String(created_at));
    Ok(EntityRecord::new(id, Value::Object(body)))
}

#[derive(Clone, Copy, PartialEq)]
enum WriteMode {
    Create,
    Update,
}

/// Keys the store manages itself. Bodies may echo them back, but they are
/// never written from the body.
const MANAGED_KEYS: [&str; 3] = ["id", "createdAt", "updatedAt"];

/// Turns a write body into column/value pairs for the statement builders.
///
/// Every body key must name a catalog attribute; unknown keys are rejected
/// rather than dropped. Explicit JSON null clears a column, except on
/// required attributes, where it counts as missing. On create, every
/// attribute marked required must be present.
fn collect_write_values(
    scope: &str,
    attributes: &[AttributeDef],
    body: &Value,
    mode: WriteMode,
) -> Result<Vec<(&'static str, BindValue)>, ValidationError> {
    let Some(object) = body.as_object() else {
        return Err(ValidationError::InvalidBody {
            message: "expected a JSON object".to_string(),
        });
    };

    for key in object.keys() {
        if MANAGED_KEYS.contains(&key.as_str()) {
            continue;
        }
        if !attributes.iter().any(|attr| attr.name == key) {
            return Err(ValidationError::UnknownAttribute {
                entity: scope.to_string(),
                attribute: key.clone(),
            });
        }
    }

    let missing = |attr: &AttributeDef| ValidationError::MissingAttribute {
        entity: scope.to_string(),
        attribute: attr.name.to_string(),
    };

    let mut values = Vec::with_capacity(object.len());
    for attr in attributes {
        match object.get(attr.name) {
            Some(Value::Null) => {
                // Required columns are NOT NULL; fail before the statement does
                if attr.required {
                    return Err(missing(attr));
                }
                values.push((attr.column, BindValue::Null));
            }
            Some(value) => values.push((attr.column, bind_for_attribute(attr, value)?)),
            None => {
                if mode == WriteMode::Create && attr.required {
                    return Err(missing(attr));
                }
            }
        }
    }
    Ok(values)
}

fn select_entities(
    conn: &Connection,
    entity: &EntityConfig,
    predicates: &[Predicate],
) -> StoreResult<Vec<EntityRecord>> {
    let query = build_search(entity, predicates);
    let mut stmt = conn
        .prepare(&query.sql)
        .map_err(|e| query_error(format!("Failed to prepare {} search: {}", entity.path, e)))?;
    let rows = stmt
        .query_map(params_from_iter(query.binds.iter()), |row| {
            entity_from_row(entity, row)
        })
        .map_err(|e| query_error(format!("Failed to search {}: {}", entity.path, e)))?;

    let mut records = Vec::new();
    for row in rows {
        records
            .push(row.map_err(|e| query_error(format!("Failed to read {} row: {}", entity.path, e)))?);
    }
    Ok(records)
}

fn select_one(
    conn: &Connection,
    entity: &EntityConfig,
    predicate: Predicate,
) -> StoreResult<Option<EntityRecord>> {
    let query = build_search(entity, std::slice::from_ref(&predicate));
    let result = conn.query_row(&query.sql, params_from_iter(query.binds.iter()), |row| {
        entity_from_row(entity, row)
    });
    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(query_error(format!(
            "Failed to read {}: {}",
            entity.path, e
        ))),
    }
}

fn select_one_child(
    conn: &Connection,
    child: &ChildCollectionDef,
    id: i64,
) -> StoreResult<Option<EntityRecord>> {
    let query = build_child_lookup(child, id);
    let result = conn.query_row(&query.sql, params_from_iter(query.binds.iter()), |row| {
        child_from_row(child, row)
    });
    match result {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(query_error(format!(
            "Failed to read {}: {}",
            child.segment, e
        ))),
    }
}

#[async_trait]
impl EntityStore for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn health_check(&self) -> StoreResult<()> {
        let conn = self.get_connection()?;
        conn.query_row("SELECT 1", [], |_| Ok(())).map_err(|e| {
            StoreError::Backend(BackendError::Unavailable {
                backend_name: "sqlite".to_string(),
                message: e.to_string(),
            })
        })?;
        Ok(())
    }

    async fn search(
        &self,
        entity: &EntityConfig,
        filter: &FilterSpec,
    ) -> StoreResult<Vec<EntityRecord>> {
        let predicates = build_predicates(entity, filter)?;
        let conn = self.get_connection()?;
        let records = select_entities(&conn, entity, &predicates)?;
        debug!(
            entity = entity.path,
            predicates = predicates.len(),
            results = records.len(),
            "search executed"
        );
        Ok(records)
    }

    async fn find_by_id(
        &self,
        entity: &EntityConfig,
        id: i64,
    ) -> StoreResult<Option<EntityRecord>> {
        let conn = self.get_connection()?;
        select_one(&conn, entity, Predicate::equals("id", BindValue::Integer(id)))
    }

    async fn find_by_natural_key(
        &self,
        entity: &EntityConfig,
        value: &str,
    ) -> StoreResult<Option<EntityRecord>> {
        let Some(natural_key) = entity.natural_key else {
            return Ok(None);
        };
        let conn = self.get_connection()?;
        select_one(
            &conn,
            entity,
            Predicate::equals(natural_key.column, BindValue::text(value)),
        )
    }

    async fn create(&self, entity: &EntityConfig, body: &Value) -> StoreResult<EntityRecord> {
        let mut values =
            collect_write_values(entity.path, entity.attributes, body, WriteMode::Create)?;
        let now = Utc::now().to_rfc3339();
        values.push(("created_at", BindValue::text(now.clone())));
        values.push(("updated_at", BindValue::text(now)));

        let conn = self.get_connection()?;
        let query = build_insert(entity.table, &values);
        conn.execute(&query.sql, params_from_iter(query.binds.iter()))
            .map_err(|e| query_error(format!("Failed to create {}: {}", entity.path, e)))?;
        let id = conn.last_insert_rowid();
        debug!(entity = entity.path, id, "record created");

        select_one(&conn, entity, Predicate::equals("id", BindValue::Integer(id)))?.ok_or_else(
            || query_error(format!("Created {} {} could not be read back", entity.path, id)),
        )
    }

    async fn update(
        &self,
        entity: &EntityConfig,
        id: i64,
        body: &Value,
    ) -> StoreResult<EntityRecord> {
        let mut values =
            collect_write_values(entity.path, entity.attributes, body, WriteMode::Update)?;
        values.push(("updated_at", BindValue::text(Utc::now().to_rfc3339())));

        let conn = self.get_connection()?;
        let query = build_update(entity.table, &values, id);
        let affected = conn
            .execute(&query.sql, params_from_iter(query.binds.iter()))
            .map_err(|e| query_error(format!("Failed to update {} {}: {}", entity.path, id, e)))?;
        if affected == 0 {
            return Err(not_found(entity, id));
        }
        debug!(entity = entity.path, id, "record updated");

        select_one(&conn, entity, Predicate::equals("id", BindValue::Integer(id)))?.ok_or_else(
            || query_error(format!("Updated {} {} could not be read back", entity.path, id)),
        )
    }

    async fn delete(&self, entity: &EntityConfig, id: i64) -> StoreResult<()> {
        let conn = self.get_connection()?;
        let query = build_delete(entity.table, id);
        let affected = conn
            .execute(&query.sql, params_from_iter(query.binds.iter()))
            .map_err(|e| query_error(format!("Failed to delete {} {}: {}", entity.path, id, e)))?;
        if affected == 0 {
            return Err(not_found(entity, id));
        }
        debug!(entity = entity.path, id, "record deleted");
        Ok(())
    }

    async fn list_children(
        &self,
        entity: &EntityConfig,
        child: &ChildCollectionDef,
        parent_id: i64,
    ) -> StoreResult<Vec<EntityRecord>> {
        let conn = self.get_connection()?;
        let query = build_child_search(child, parent_id);
        let mut stmt = conn.prepare(&query.sql).map_err(|e| {
            query_error(format!("Failed to prepare {} listing: {}", child.segment, e))
        })?;
        let rows = stmt
            .query_map(params_from_iter(query.binds.iter()), |row| {
                child_from_row(child, row)
            })
            .map_err(|e| query_error(format!("Failed to list {}: {}", child.segment, e)))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(
                row.map_err(|e| query_error(format!("Failed to read {} row: {}", child.segment, e)))?,
            );
        }
        debug!(
            entity = entity.path,
            collection = child.segment,
            parent_id,
            results = records.len(),
            "children listed"
        );
        Ok(records)
    }

    async fn create_child(
        &self,
        entity: &EntityConfig,
        child: &ChildCollectionDef,
        parent_id: i64,
        body: &Value,
    ) -> StoreResult<EntityRecord> {
        let scope = format!("{}/{}", entity.path, child.segment);
        let mut values = collect_write_values(&scope, child.attributes, body, WriteMode::Create)?;
        values.insert(0, (child.parent_column, BindValue::Integer(parent_id)));
        values.push(("created_at", BindValue::text(Utc::now().to_rfc3339())));

        let conn = self.get_connection()?;

        // Listing under a missing parent is just empty; creating under one is
        // an error.
        let parent_check = format!("SELECT 1 FROM {} WHERE id = ?1", entity.table);
        match conn.query_row(&parent_check, params![parent_id], |_| Ok(())) {
            Ok(()) => {}
            Err(rusqlite::Error::QueryReturnedNoRows) => return Err(not_found(entity, parent_id)),
            Err(e) => {
                return Err(query_error(format!(
                    "Failed to check {} {}: {}",
                    entity.path, parent_id, e
                )));
            }
        }

        let query = build_insert(child.table, &values);
        conn.execute(&query.sql, params_from_iter(query.binds.iter()))
            .map_err(|e| query_error(format!("Failed to create {}: {}", scope, e)))?;
        let id = conn.last_insert_rowid();
        debug!(
            entity = entity.path,
            collection = child.segment,
            parent_id,
            id,
            "child record created"
        );

        select_one_child(&conn, child, id)?.ok_or_else(|| {
            query_error(format!("Created {} {} could not be read back", scope, id))
        })
    }

    async fn count(&self, entity: &EntityConfig) -> StoreResult<u64> {
        let conn = self.get_connection()?;
        let sql = format!("SELECT COUNT(*) FROM {}", entity.table);
        let count: i64 = conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| query_error(format!("Failed to count {}: {}", entity.path, e)))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LANDS, RENTALS};
    use serde_json::json;

    #[test]
    fn test_collect_write_values_skips_managed_keys() {
        let body = json!({
            "id": 42,
            "createdAt": "2024-01-01T00:00:00Z",
            "referenceNumber": "LND-1",
            "governorate": "Cairo"
        });
        let values =
            collect_write_values("lands", LANDS.attributes, &body, WriteMode::Update).unwrap();
        assert!(values.iter().all(|(column, _)| *column != "id"));
        assert!(
            values
                .iter()
                .any(|(column, value)| *column == "headquarters"
                    && *value == BindValue::text("Cairo"))
        );
    }

    #[test]
    fn test_collect_write_values_rejects_unknown_attribute() {
        let body = json!({ "referenceNumber": "LND-1", "color": "green" });
        let err =
            collect_write_values("lands", LANDS.attributes, &body, WriteMode::Update).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::UnknownAttribute { ref attribute, .. } if attribute == "color"
        ));
    }

    #[test]
    fn test_collect_write_values_requires_required_on_create() {
        let body = json!({ "governorate": "Giza" });
        let err =
            collect_write_values("lands", LANDS.attributes, &body, WriteMode::Create).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MissingAttribute { ref attribute, .. } if attribute == "referenceNumber"
        ));
    }

    #[test]
    fn test_collect_write_values_update_tolerates_absent_required() {
        let body = json!({ "governorate": "Giza" });
        let values =
            collect_write_values("lands", LANDS.attributes, &body, WriteMode::Update).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].0, "headquarters");
    }

    #[test]
    fn test_collect_write_values_null_clears_column() {
        let body = json!({ "notes": null });
        let values =
            collect_write_values("lands", LANDS.attributes, &body, WriteMode::Update).unwrap();
        assert_eq!(values, vec![("notes", BindValue::Null)]);
    }

    #[test]
    fn test_collect_write_values_rejects_null_required() {
        let body = json!({ "referenceNumber": null });
        let err = collect_write_values("lands", LANDS.attributes, &body, WriteMode::Update)
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingAttribute { .. }));
    }

    #[test]
    fn test_collect_write_values_boolean_binds_as_integer() {
        let body = json!({ "maintenanceRequired": true });
        let values =
            collect_write_values("rentals", RENTALS.attributes, &body, WriteMode::Update).unwrap();
        assert_eq!(values, vec![("maintenance_required", BindValue::Integer(1))]);
    }

    #[tokio::test]
    async fn test_boolean_round_trips_through_projection() {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();
        let record = backend
            .create(
                &RENTALS,
                &json!({
                    "identificationNumber": "RNT-77",
                    "buildingName": "Nile school annex",
                    "maintenanceRequired": true
                }),
            )
            .await
            .unwrap();
        assert_eq!(record.get("maintenanceRequired"), Some(&json!(true)));
        assert_eq!(record.get("monthlyRent"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_create_stamps_timestamps() {
        let backend = SqliteBackend::in_memory().unwrap();
        backend.init_schema().unwrap();
        let record = backend
            .create(&LANDS, &json!({ "referenceNumber": "LND-9" }))
            .await
            .unwrap();
        let created = record.get("createdAt").and_then(Value::as_str).unwrap();
        let updated = record.get("updatedAt").and_then(Value::as_str).unwrap();
        assert_eq!(created, updated);
        assert!(created.starts_with("20"));
    }
}
