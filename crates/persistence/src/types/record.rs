//! Stored entity rows.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// An entity row with its identity.
///
/// The search protocol depends only on the row id and the ordering key; every
/// other attribute passes through as stored. The body serializes exactly as it
/// goes out on the wire, wire attribute names included.
///
/// # Examples
///
/// ```
/// use manar_persistence::types::EntityRecord;
/// use serde_json::json;
///
/// let record = EntityRecord::new(7, json!({"id": 7, "referenceNumber": "REF-1"}));
/// assert_eq!(record.id(), 7);
/// assert_eq!(record.get("referenceNumber"), Some(&json!("REF-1")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    id: i64,
    body: Value,
}

impl EntityRecord {
    /// Wraps a row id and its JSON body.
    pub fn new(id: i64, body: Value) -> Self {
        Self { id, body }
    }

    /// The row id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The full JSON body, including `id` and the timestamps.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// One attribute of the body, by wire name.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.body.get(attribute)
    }

    /// Consumes the record, returning the body.
    pub fn into_body(self) -> Value {
        self.body
    }
}

impl Serialize for EntityRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}
