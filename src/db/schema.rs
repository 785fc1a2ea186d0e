//! SQL DDL for initializing the user storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `email` UNIQUE, stored normalized; the constraint is what rejects
///   concurrent duplicate registrations
/// - `password_hash` Argon2id PHC string
/// - `created_at` RFC3339
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);
"#;
