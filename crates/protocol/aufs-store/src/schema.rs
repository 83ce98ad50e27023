//! SQL schema initialization.
//!
//! This module defines the database schema for SQLite storage.

use rusqlite::{Connection, OptionalExtension};

use crate::error::{Result, StoreError};

/// Schema version for migration tracking.
pub const SCHEMA_VERSION: u32 = 1;

/// Scalar keys stored in the `scalars` table.
pub(crate) const KEY_DEFAULT_PRICE: &str = "default_price";
pub(crate) const KEY_TOTAL_TAXES: &str = "total_taxes";
pub(crate) const KEY_TOTAL_SUPPLY: &str = "total_supply";

/// Initialize the database schema.
///
/// Creates all tables and indexes if they don't exist.
/// This function is idempotent - calling it multiple times is safe.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version: Option<u32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;

    match current_version {
        None => {
            create_tables(conn)?;
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )?;
            tracing::debug!(version = SCHEMA_VERSION, "Created registry schema");
        }
        Some(version) if version > SCHEMA_VERSION => {
            return Err(StoreError::schema(format!(
                "database schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }
        Some(_) => {}
    }

    Ok(())
}

/// Create all database tables.
fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS delegations (
            path TEXT NOT NULL,
            attr INTEGER NOT NULL,
            grantee BLOB NOT NULL,
            granted_by BLOB NOT NULL,
            created_at INTEGER NOT NULL,
            PRIMARY KEY (path, attr)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_delegations_grantee ON delegations(grantee)",
        [],
    )?;

    // expires_at NULL means indefinite
    conn.execute(
        "CREATE TABLE IF NOT EXISTS authorizations (
            path TEXT NOT NULL,
            principal BLOB NOT NULL,
            capabilities INTEGER NOT NULL,
            expires_at INTEGER,
            granted_by BLOB NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (path, principal)
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS uris (
            path TEXT PRIMARY KEY,
            fingerprint BLOB NOT NULL,
            beneficiary BLOB NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_prices (
            principal BLOB PRIMARY KEY,
            price INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS balances (
            principal BLOB PRIMARY KEY,
            amount INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS scalars (
            key TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        )",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn test_initialize_creates_tables() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        let tables = table_names(&conn);
        for expected in [
            "authorizations",
            "balances",
            "delegations",
            "scalars",
            "schema_version",
            "uris",
            "user_prices",
        ] {
            assert!(tables.contains(&expected.to_string()), "missing {}", expected);
        }
    }

    #[test]
    fn test_initialize_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        conn.execute("UPDATE schema_version SET version = ?1", [SCHEMA_VERSION + 1])
            .unwrap();
        assert!(matches!(
            initialize_schema(&conn),
            Err(StoreError::Schema(_))
        ));
    }
}
