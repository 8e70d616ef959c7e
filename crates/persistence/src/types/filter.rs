//! Search filter types.
//!
//! A [`FilterSpec`] is the parsed form of a search request body: a sparse map
//! from attribute name to scalar value. Entries a client left blank never make
//! it into the filter, so an all-blank form submits the same thing as no body
//! at all.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ValidationError;

/// A sparse attribute filter.
///
/// Keys that are absent, JSON `null`, or an empty string are not part of the
/// filter. Values are scalars; arrays and objects are rejected. Iteration
/// order is the attribute name order, so the same filter always renders the
/// same SQL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    values: BTreeMap<String, Value>,
}

impl FilterSpec {
    /// An empty filter, matching every row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a request body into a filter.
    ///
    /// `null` (an absent body) parses as the empty filter. Anything other
    /// than `null` or a JSON object is rejected.
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let mut spec = Self::new();
        match body {
            Value::Null => Ok(spec),
            Value::Object(entries) => {
                for (attribute, value) in entries {
                    spec.insert(attribute.clone(), value.clone())?;
                }
                Ok(spec)
            }
            _ => Err(ValidationError::InvalidBody {
                message: "expected a JSON object".to_string(),
            }),
        }
    }

    /// Adds one entry, applying the sparse-filter rules: `null` and empty
    /// strings are dropped, non-scalar values are rejected.
    pub fn insert(
        &mut self,
        attribute: impl Into<String>,
        value: Value,
    ) -> Result<(), ValidationError> {
        let attribute = attribute.into();
        match &value {
            Value::Null => Ok(()),
            Value::String(s) if s.is_empty() => Ok(()),
            Value::Array(_) | Value::Object(_) => Err(ValidationError::InvalidValue {
                attribute,
                expected: "a scalar value",
            }),
            _ => {
                self.values.insert(attribute, value);
                Ok(())
            }
        }
    }

    /// The value supplied for an attribute, if one survived normalization.
    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.values.get(attribute)
    }

    /// True when no usable entries were supplied. An empty filter selects
    /// every row.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of usable entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates entries in attribute name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_null_is_empty() {
        let spec = FilterSpec::from_json(&Value::Null).unwrap();
        assert!(spec.is_empty());
    }

    #[test]
    fn test_from_json_skips_blank_entries() {
        let spec = FilterSpec::from_json(&json!({
            "governorate": "Cairo",
            "phase": "",
            "usageStatus": null,
        }))
        .unwrap();
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get("governorate"), Some(&json!("Cairo")));
        assert!(spec.get("phase").is_none());
    }

    #[test]
    fn test_whitespace_string_is_kept() {
        // only the exactly-empty string is treated as blank
        let spec = FilterSpec::from_json(&json!({"phase": "  "})).unwrap();
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_false_and_zero_are_kept() {
        let spec = FilterSpec::from_json(&json!({
            "maintenanceRequired": false,
            "classroomCount": 0,
        }))
        .unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get("maintenanceRequired"), Some(&json!(false)));
    }

    #[test]
    fn test_non_scalar_values_rejected() {
        let err = FilterSpec::from_json(&json!({"phase": ["A", "B"]})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidValue { ref attribute, .. } if attribute == "phase"
        ));
    }

    #[test]
    fn test_non_object_body_rejected() {
        let err = FilterSpec::from_json(&json!("phase=A")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBody { .. }));
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let spec = FilterSpec::from_json(&json!({
            "usageStatus": "active",
            "governorate": "Giza",
            "phase": "B",
        }))
        .unwrap();
        let names: Vec<&str> = spec.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["governorate", "phase", "usageStatus"]);
    }
}
