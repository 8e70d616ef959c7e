//! Typed search predicates.
//!
//! A [`Predicate`] is the validated form of one filter entry: a storage
//! column, a comparator, and a value to bind. Building predicates is where the
//! whitelist is enforced; rendering them never sees a raw attribute name
//! again.

use serde_json::Value;

use crate::catalog::{AttributeDef, AttributeType, EntityConfig};
use crate::error::ValidationError;
use crate::types::FilterSpec;

/// Comparison operator of a predicate.
///
/// Search is equality-only today; the enum keeps rendering closed over the
/// operators the builder knows how to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Exact equality.
    Equals,
}

impl Comparator {
    /// The SQL operator token.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparator::Equals => "=",
        }
    }
}

/// A value bound into a statement.
///
/// Values travel next to the SQL text, never inside it.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    /// String parameter.
    Text(String),
    /// Integer parameter. Booleans bind as 0/1.
    Integer(i64),
    /// Float parameter.
    Float(f64),
    /// Null parameter.
    Null,
}

impl BindValue {
    /// Creates a string parameter.
    pub fn text(s: impl Into<String>) -> Self {
        BindValue::Text(s.into())
    }

    /// Creates an integer parameter.
    pub fn integer(i: i64) -> Self {
        BindValue::Integer(i)
    }

    /// Creates a float parameter.
    pub fn float(f: f64) -> Self {
        BindValue::Float(f)
    }
}

/// One conjunct of a search: `column comparator value`.
#[derive(Debug, Clone)]
pub struct Predicate {
    /// Storage column the predicate applies to.
    pub column: &'static str,
    /// Comparison operator.
    pub comparator: Comparator,
    /// Value to bind.
    pub value: BindValue,
}

impl Predicate {
    /// An equality predicate.
    pub fn equals(column: &'static str, value: BindValue) -> Self {
        Predicate {
            column,
            comparator: Comparator::Equals,
            value,
        }
    }
}

/// Converts a supplied JSON value to the bind form of an attribute, enforcing
/// the attribute's declared type.
pub fn bind_for_attribute(
    attr: &AttributeDef,
    value: &Value,
) -> Result<BindValue, ValidationError> {
    let invalid = || ValidationError::InvalidValue {
        attribute: attr.name.to_string(),
        expected: attr.ty.expected(),
    };
    let normalized = attr.ty.normalize(value).ok_or_else(invalid)?;
    match (attr.ty, normalized) {
        (AttributeType::Text | AttributeType::Date, Value::String(s)) => Ok(BindValue::Text(s)),
        (AttributeType::Integer, Value::Number(n)) => {
            Ok(BindValue::Integer(n.as_i64().unwrap_or_default()))
        }
        (AttributeType::Float, Value::Number(n)) => {
            Ok(BindValue::Float(n.as_f64().unwrap_or_default()))
        }
        (AttributeType::Boolean, Value::Bool(b)) => Ok(BindValue::Integer(b as i64)),
        _ => Err(invalid()),
    }
}

/// Validates a filter against an entity's whitelist and produces the
/// predicate conjunction.
///
/// Any attribute outside the whitelist fails the whole filter; a misspelled
/// key must not silently return the full table. The empty filter produces the
/// empty conjunction, which selects every row.
pub fn build_predicates(
    entity: &EntityConfig,
    filter: &FilterSpec,
) -> Result<Vec<Predicate>, ValidationError> {
    let mut predicates = Vec::with_capacity(filter.len());
    for (name, value) in filter.iter() {
        let attr = entity.filterable_attribute(name).ok_or_else(|| {
            ValidationError::UnknownAttribute {
                entity: entity.path.to_string(),
                attribute: name.to_string(),
            }
        })?;
        predicates.push(Predicate::equals(attr.column, bind_for_attribute(attr, value)?));
    }
    Ok(predicates)
}
