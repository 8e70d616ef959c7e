//! Core storage traits and abstractions.
//!
//! This module provides the foundational trait for the persistence layer:
//!
//! - [`EntityStore`] - Catalog-driven search and CRUD operations
//!
//! Backends implement [`EntityStore`] once; every entity family flows through
//! the same methods, parameterized by its catalog entry.

mod store;

pub use store::EntityStore;
