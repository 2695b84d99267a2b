//! `SQLite` schema for the key-value store.

use rusqlite::Connection;

use crate::error::Result;

/// SQL statement to create the entries table.
pub const CREATE_ENTRIES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS entries (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_ENTRIES_TABLE];

/// Create the schema if it does not exist yet.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for stmt in SCHEMA_STATEMENTS {
        conn.execute_batch(stmt)?;
    }
    Ok(())
}
