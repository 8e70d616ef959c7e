//! Core types for the persistence layer.
//!
//! This module provides the fundamental types used throughout the persistence
//! layer:
//!
//! - [`FilterSpec`] - A sparse attribute filter for search requests
//! - [`EntityRecord`] - An entity row with its identity
//!
//! # Examples
//!
//! ## Building a filter
//!
//! ```
//! use manar_persistence::types::FilterSpec;
//! use serde_json::json;
//!
//! let filter = FilterSpec::from_json(&json!({
//!     "governorate": "Cairo",
//!     "phase": "",
//!     "usageStatus": null,
//! }))
//! .unwrap();
//!
//! // empty and null entries are not part of the filter
//! assert_eq!(filter.len(), 1);
//! assert_eq!(filter.get("governorate"), Some(&json!("Cairo")));
//! ```

mod filter;
mod record;

pub use filter::FilterSpec;
pub use record::EntityRecord;
