//! Database module: connector, models and schema for persistent storage.
//!
//! Layout:
//! - `connector.rs`: process-wide cached pool with single-flight init
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: user queries on top of the pool

pub mod connector;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use connector::{DATABASE, Database};
pub use models::DbUser;
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, UserStorage};
