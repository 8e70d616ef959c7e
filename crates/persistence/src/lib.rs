//! Manar Registry Persistence Layer
//!
//! This crate stores and searches the records of the school construction
//! registry: lands, buildings, rental buildings, and displacement cases. Every
//! entity family goes through the same catalog-driven pipeline, so search,
//! lookup, and mutation behave identically across the four.
//!
//! # Features
//!
//! - **Catalog-driven entities**: One [`EntityConfig`](catalog::EntityConfig)
//!   per family describes attributes, the filter whitelist, the natural key,
//!   and child collections
//! - **Conjunctive search**: Sparse filters fold into an AND of equality
//!   predicates; values only ever travel as bound parameters
//! - **Fixed ordering**: Results always come back newest-first, with an id
//!   tie-break
//! - **Child collections**: Land coordinates and rental decisions live under
//!   their parent records
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! manar-persistence = { version = "0.1", features = ["sqlite"] }
//! ```
//!
//! Available backend features:
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Architecture
//!
//! The persistence layer is organized into several modules:
//!
//! - [`catalog`] - Entity descriptions: attributes, whitelists, natural keys,
//!   child collections
//! - [`types`] - Filter specifications and entity records
//! - [`error`] - Error types for all operations
//! - [`search`] - Predicate building and parameterized statement rendering
//! - [`core`] - The [`EntityStore`](core::EntityStore) trait
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```no_run
//! use manar_persistence::backends::sqlite::SqliteBackend;
//! use manar_persistence::catalog::LANDS;
//! use manar_persistence::core::EntityStore;
//! use manar_persistence::types::FilterSpec;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::open("manar.db")?;
//! backend.init_schema()?;
//!
//! let land = backend
//!     .create(
//!         &LANDS,
//!         &json!({
//!             "referenceNumber": "LND-2024-0001",
//!             "governorate": "Cairo",
//!             "usageStatus": "vacant"
//!         }),
//!     )
//!     .await?;
//!
//! // Sparse filters only constrain the attributes they name
//! let filter = FilterSpec::from_json(&json!({ "governorate": "Cairo" }))?;
//! let results = backend.search(&LANDS, &filter).await?;
//! assert!(results.iter().any(|r| r.id() == land.id()));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod catalog;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use catalog::{ENTITIES, EntityConfig, entity_by_path};
pub use core::EntityStore;
pub use error::{StoreError, StoreResult};
pub use types::{EntityRecord, FilterSpec};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
