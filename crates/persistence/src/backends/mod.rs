//! Database backend implementations.
//!
//! This module contains implementations of the [`EntityStore`] trait. Each
//! backend is gated behind a feature flag.
//!
//! # Available Backends
//!
//! | Backend | Feature | Description |
//! |---------|---------|-------------|
//! | SQLite | `sqlite` | Lightweight embedded database, in-memory and file modes |
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "sqlite")]
//! use manar_persistence::backends::sqlite::SqliteBackend;
//!
//! # #[cfg(feature = "sqlite")]
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory SQLite backend
//! let backend = SqliteBackend::in_memory()?;
//!
//! // Or use a file-based database
//! let backend = SqliteBackend::open("./data/manar.db")?;
//! # Ok(())
//! # }
//! ```
//!
//! [`EntityStore`]: crate::core::EntityStore

#[cfg(feature = "sqlite")]
pub mod sqlite;
