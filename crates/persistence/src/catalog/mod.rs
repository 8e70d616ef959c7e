//! The entity catalog.
//!
//! Every entity family the registry serves is described by a static
//! [`EntityConfig`]: its table, its attribute whitelist, its natural key, its
//! fixed ordering, and its child collections. The search and mutation paths are
//! generic over these configs, so adding an entity is a catalog entry, not new
//! code.
//!
//! Attribute names are the wire names (camelCase); columns are the storage
//! names (snake_case). The two are allowed to differ, and the catalog is the
//! only place that knows the mapping.

use serde_json::Value;

mod entities;

pub use entities::{BUILDINGS, DISPLACEMENTS, ENTITIES, LANDS, RENTALS, entity_by_path};

/// The scalar type an attribute carries.
///
/// Dates are ISO-8601 strings on the wire and in storage; they get their own
/// variant so error messages can say what was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// UTF-8 text.
    Text,
    /// 64-bit signed integer.
    Integer,
    /// Double-precision float.
    Float,
    /// Boolean, stored as a 0/1 integer.
    Boolean,
    /// ISO-8601 date or datetime string.
    Date,
}

impl AttributeType {
    /// Human-readable description of the accepted value, for error messages.
    pub fn expected(&self) -> &'static str {
        match self {
            AttributeType::Text => "a string value",
            AttributeType::Integer => "an integer value",
            AttributeType::Float => "a numeric value",
            AttributeType::Boolean => "a boolean value",
            AttributeType::Date => "a date string",
        }
    }

    /// Coerces a JSON value to this type's canonical JSON form.
    ///
    /// Numeric attributes accept JSON numbers or numeric strings, since form
    /// inputs arrive as strings. Returns `None` when the value cannot carry
    /// this type.
    pub fn normalize(&self, value: &Value) -> Option<Value> {
        match self {
            AttributeType::Text | AttributeType::Date => {
                value.as_str().map(|s| Value::String(s.to_string()))
            }
            AttributeType::Integer => match value {
                Value::Number(n) => n.as_i64().map(Value::from),
                Value::String(s) => s.trim().parse::<i64>().ok().map(Value::from),
                _ => None,
            },
            AttributeType::Float => match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
            AttributeType::Boolean => value.as_bool().map(Value::Bool),
        }
    }
}

/// One attribute of an entity or child collection.
#[derive(Debug, Clone, Copy)]
pub struct AttributeDef {
    /// Wire name (camelCase), as it appears in filter and write bodies.
    pub name: &'static str,
    /// Storage column name (snake_case).
    pub column: &'static str,
    /// Scalar type of the attribute.
    pub ty: AttributeType,
    /// Whether search filters may reference this attribute.
    pub filterable: bool,
    /// Whether a create must supply this attribute.
    pub required: bool,
}

impl AttributeDef {
    /// A plain attribute: not filterable, not required.
    pub const fn new(name: &'static str, column: &'static str, ty: AttributeType) -> Self {
        AttributeDef {
            name,
            column,
            ty,
            filterable: false,
            required: false,
        }
    }

    /// Marks the attribute as part of the search whitelist.
    pub const fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    /// Marks the attribute as required on create.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Sort direction for an ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortOrder {
    /// The SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// The fixed per-entity ordering. Clients cannot override it.
///
/// `id` is always appended as a tie-breaker in the same direction, so rows
/// with equal ordering values cannot reorder between identical searches.
#[derive(Debug, Clone, Copy)]
pub struct OrderingKey {
    /// Column to order by.
    pub column: &'static str,
    /// Direction to order in.
    pub order: SortOrder,
}

/// Default ordering for entity tables: newest first.
pub const CREATED_DESC: OrderingKey = OrderingKey {
    column: "created_at",
    order: SortOrder::Descending,
};

/// The human-facing unique identifier of an entity, addressed by a `by-*`
/// URL segment.
#[derive(Debug, Clone, Copy)]
pub struct NaturalKeyDef {
    /// URL segment, e.g. `by-reference`.
    pub segment: &'static str,
    /// Wire name of the attribute holding the key.
    pub attribute: &'static str,
    /// Storage column holding the key.
    pub column: &'static str,
}

/// A dependent collection stored in its own table and addressed under its
/// parent, e.g. the coordinate points of a land parcel.
#[derive(Debug, Clone, Copy)]
pub struct ChildCollectionDef {
    /// URL segment under the parent, e.g. `coordinates`.
    pub segment: &'static str,
    /// Storage table.
    pub table: &'static str,
    /// Column referencing the parent row.
    pub parent_column: &'static str,
    /// Wire name of the parent reference.
    pub parent_attribute: &'static str,
    /// Attributes of the child rows.
    pub attributes: &'static [AttributeDef],
    /// Fixed ordering of the collection.
    pub ordering: OrderingKey,
}

impl ChildCollectionDef {
    /// Looks up a child attribute by wire name.
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// The static description of one entity family.
#[derive(Debug, Clone, Copy)]
pub struct EntityConfig {
    /// URL collection segment, e.g. `lands`. Doubles as the entity's name in
    /// validation messages.
    pub path: &'static str,
    /// Display name used in not-found messages, e.g. `Land`.
    pub display_name: &'static str,
    /// Storage table.
    pub table: &'static str,
    /// All attributes, filterable or not.
    pub attributes: &'static [AttributeDef],
    /// The `by-*` lookup key, if the entity has one.
    pub natural_key: Option<NaturalKeyDef>,
    /// Fixed result ordering.
    pub ordering: OrderingKey,
    /// Dependent collections.
    pub children: &'static [ChildCollectionDef],
}

impl EntityConfig {
    /// Looks up an attribute by wire name.
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Looks up an attribute by wire name, but only if filters may use it.
    pub fn filterable_attribute(&self, name: &str) -> Option<&'static AttributeDef> {
        self.attributes.iter().find(|a| a.filterable && a.name == name)
    }

    /// Looks up a child collection by URL segment.
    pub fn child(&self, segment: &str) -> Option<&'static ChildCollectionDef> {
        self.children.iter().find(|c| c.segment == segment)
    }
}
