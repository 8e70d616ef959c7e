//! The entity search protocol.
//!
//! Search is an AND-fold of equality predicates over a [`FilterSpec`],
//! validated against the entity's attribute whitelist and rendered through one
//! fixed parameterized statement builder:
//!
//! - [`predicate`] - Typed predicates and filter-to-predicate validation
//! - [`query`] - Statement rendering with `?N` placeholders
//!
//! Single-record lookups (by id, by natural key) are the degenerate
//! one-predicate case of the same pipeline.
//!
//! [`FilterSpec`]: crate::types::FilterSpec

pub mod predicate;
pub mod query;

pub use predicate::{BindValue, Comparator, Predicate, bind_for_attribute, build_predicates};
pub use query::{
    SqlQuery, build_child_lookup, build_child_search, build_delete, build_insert, build_search,
    build_update,
};
