//! SQLite backend implementation.
//!
//! This module provides the SQLite implementation of [`EntityStore`]. It
//! supports both in-memory databases (great for testing) and file-based
//! databases (for development and small deployments).
//!
//! # Example
//!
//! ```no_run
//! use manar_persistence::backends::sqlite::SqliteBackend;
//! use manar_persistence::catalog::LANDS;
//! use manar_persistence::core::EntityStore;
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an in-memory database and bring the schema up to date
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//!
//! let land = backend
//!     .create(&LANDS, &json!({"referenceNumber": "REF-1", "governorate": "Cairo"}))
//!     .await?;
//! assert_eq!(land.get("governorate"), Some(&json!("Cairo")));
//! # Ok(())
//! # }
//! ```
//!
//! [`EntityStore`]: crate::core::EntityStore

mod backend;
pub mod schema;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqliteValue, ValueRef};

use crate::search::BindValue;

impl ToSql for BindValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            BindValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            BindValue::Integer(i) => ToSqlOutput::Owned(SqliteValue::Integer(*i)),
            BindValue::Float(f) => ToSqlOutput::Owned(SqliteValue::Real(*f)),
            BindValue::Null => ToSqlOutput::Owned(SqliteValue::Null),
        })
    }
}
