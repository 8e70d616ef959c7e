//! Fixed parameterized statement rendering.
//!
//! Every statement the backend executes comes out of this module. Projection
//! lists, table names, and ordering come from the catalog; user-supplied
//! values only ever land in [`SqlQuery::binds`] as `?N` placeholders.

use crate::catalog::{ChildCollectionDef, EntityConfig, OrderingKey};

use super::predicate::{BindValue, Predicate};

/// A SQL statement with its bound parameter values.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    /// The SQL text with `?N` placeholders.
    pub sql: String,
    /// Bound values, in placeholder order.
    pub binds: Vec<BindValue>,
}

impl SqlQuery {
    /// Creates a statement with no bound values yet.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    /// Adds a bound value and returns its `?N` placeholder.
    pub fn bind(&mut self, value: BindValue) -> String {
        self.binds.push(value);
        format!("?{}", self.binds.len())
    }
}

fn entity_columns(entity: &EntityConfig) -> String {
    let mut columns = Vec::with_capacity(entity.attributes.len() + 3);
    columns.push("id");
    columns.extend(entity.attributes.iter().map(|a| a.column));
    columns.push("created_at");
    columns.push("updated_at");
    columns.join(", ")
}

fn child_columns(child: &ChildCollectionDef) -> String {
    let mut columns = Vec::with_capacity(child.attributes.len() + 3);
    columns.push("id");
    columns.push(child.parent_column);
    columns.extend(child.attributes.iter().map(|a| a.column));
    columns.push("created_at");
    columns.join(", ")
}

// The id tie-break keeps equal ordering values stable across identical
// searches.
fn order_clause(ordering: &OrderingKey) -> String {
    format!(
        "ORDER BY {} {}, id {}",
        ordering.column,
        ordering.order.as_sql(),
        ordering.order.as_sql()
    )
}

fn append_where(query: &mut SqlQuery, predicates: &[Predicate]) {
    for (i, predicate) in predicates.iter().enumerate() {
        let keyword = if i == 0 { " WHERE" } else { " AND" };
        let placeholder = query.bind(predicate.value.clone());
        query.sql.push_str(&format!(
            "{} {} {} {}",
            keyword,
            predicate.column,
            predicate.comparator.as_sql(),
            placeholder
        ));
    }
}

/// Renders a search over an entity table.
///
/// The empty conjunction renders with no WHERE clause and selects every row;
/// the fixed ORDER BY is always present. Single-record lookups reuse this
/// with a one-predicate conjunction.
pub fn build_search(entity: &EntityConfig, predicates: &[Predicate]) -> SqlQuery {
    let mut query = SqlQuery::new(format!(
        "SELECT {} FROM {}",
        entity_columns(entity),
        entity.table
    ));
    append_where(&mut query, predicates);
    query.sql.push(' ');
    query.sql.push_str(&order_clause(&entity.ordering));
    query
}

/// Renders the listing of a child collection under one parent row.
pub fn build_child_search(child: &ChildCollectionDef, parent_id: i64) -> SqlQuery {
    let mut query = SqlQuery::new(format!(
        "SELECT {} FROM {}",
        child_columns(child),
        child.table
    ));
    let placeholder = query.bind(BindValue::Integer(parent_id));
    query.sql.push_str(&format!(
        " WHERE {} = {} ",
        child.parent_column, placeholder
    ));
    query.sql.push_str(&order_clause(&child.ordering));
    query
}

/// Renders the lookup of one child row by id.
pub fn build_child_lookup(child: &ChildCollectionDef, id: i64) -> SqlQuery {
    let mut query = SqlQuery::new(format!(
        "SELECT {} FROM {} WHERE id = ",
        child_columns(child),
        child.table
    ));
    let placeholder = query.bind(BindValue::Integer(id));
    query.sql.push_str(&placeholder);
    query
}

/// Renders an INSERT over explicit column/value pairs.
pub fn build_insert(table: &str, values: &[(&str, BindValue)]) -> SqlQuery {
    let mut query = SqlQuery::new(format!("INSERT INTO {} (", table));
    let mut placeholders = Vec::with_capacity(values.len());
    for (i, (column, value)) in values.iter().enumerate() {
        if i > 0 {
            query.sql.push_str(", ");
        }
        query.sql.push_str(column);
        placeholders.push(query.bind(value.clone()));
    }
    query.sql.push_str(") VALUES (");
    query.sql.push_str(&placeholders.join(", "));
    query.sql.push(')');
    query
}

/// Renders an UPDATE of explicit column/value pairs on one row.
pub fn build_update(table: &str, values: &[(&str, BindValue)], id: i64) -> SqlQuery {
    let mut query = SqlQuery::new(format!("UPDATE {} SET ", table));
    for (i, (column, value)) in values.iter().enumerate() {
        if i > 0 {
            query.sql.push_str(", ");
        }
        let placeholder = query.bind(value.clone());
        query.sql.push_str(&format!("{} = {}", column, placeholder));
    }
    let id_placeholder = query.bind(BindValue::Integer(id));
    query.sql.push_str(&format!(" WHERE id = {}", id_placeholder));
    query
}

/// Renders the deletion of one row.
pub fn build_delete(table: &str, id: i64) -> SqlQuery {
    let mut query = SqlQuery::new(format!("DELETE FROM {} WHERE id = ", table));
    let placeholder = query.bind(BindValue::Integer(id));
    query.sql.push_str(&placeholder);
    query
}
