//! SQLite backend implementation.
//!
//! Supports in-memory databases (tests) and file-based databases. Connections
//! come from an r2d2 pool; every new connection gets a busy timeout, foreign
//! keys, WAL for file databases and the `fold_case` SQL function.
//!
//! # Example
//!
//! ```no_run
//! use registry_persistence::backends::sqlite::SqliteBackend;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = SqliteBackend::in_memory()?;
//! backend.init_schema()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE identification_types (
//!     code TEXT PRIMARY KEY NOT NULL,
//!     name TEXT NOT NULL,
//!     status TEXT NOT NULL DEFAULT 'A'
//! );
//!
//! CREATE TABLE patients (
//!     id INTEGER PRIMARY KEY NOT NULL,
//!     identification_type_code TEXT NOT NULL REFERENCES identification_types(code),
//!     identification_number TEXT NOT NULL UNIQUE,
//!     -- name parts, full_name, email, status, audit columns
//! );
//!
//! CREATE TABLE sequences (
//!     name TEXT PRIMARY KEY NOT NULL,
//!     value INTEGER NOT NULL
//! );
//! ```

mod backend;
mod query_builder;
mod schema;
mod sequence;
mod storage;

pub use backend::{SqliteBackend, SqliteBackendConfig};
pub use query_builder::{PatientQueryBuilder, SqlFragment, SqlParam};
