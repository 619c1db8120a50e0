//! Store schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    -- Raw per-day deltas as collected from the chain indexer.
    -- The pipeline reconstructs cumulative series from these; nothing
    -- derived is persisted.

    CREATE TABLE IF NOT EXISTS daily_new_accounts (
        network     TEXT NOT NULL,
        day         TEXT NOT NULL,
        new_count   INTEGER NOT NULL,
        PRIMARY KEY (network, day)
    );

    CREATE TABLE IF NOT EXISTS daily_deleted_accounts (
        network       TEXT NOT NULL,
        day           TEXT NOT NULL,
        deleted_count INTEGER NOT NULL,
        PRIMARY KEY (network, day)
    );

    CREATE TABLE IF NOT EXISTS daily_new_accounts_per_entity (
        network     TEXT NOT NULL,
        day         TEXT NOT NULL,
        entity_id   TEXT NOT NULL,
        new_count   INTEGER NOT NULL,
        PRIMARY KEY (network, day, entity_id)
    );

    CREATE TABLE IF NOT EXISTS entities (
        network      TEXT NOT NULL,
        slug         TEXT NOT NULL,
        title        TEXT NOT NULL,
        logo_url     TEXT,
        website_url  TEXT,
        has_contract INTEGER NOT NULL DEFAULT 0,
        PRIMARY KEY (network, slug)
    );

    CREATE INDEX IF NOT EXISTS idx_entity_daily_entity
        ON daily_new_accounts_per_entity(network, entity_id, day);
    "#,
];

/// Run any pending migrations on the connection.
pub fn migrate(conn: &Connection) -> rusqlite::Result<()> {
    let current: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (idx, migration) in MIGRATIONS.iter().enumerate() {
        let version = idx as i32 + 1;
        if version > current {
            conn.execute_batch(migration)?;
            conn.pragma_update(None, "user_version", version)?;
            tracing::info!(version, "Applied store migration");
        }
    }

    debug_assert_eq!(MIGRATIONS.len() as i32, SCHEMA_VERSION);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_fresh_database() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        // Tables still usable after a second run.
        conn.execute(
            "INSERT INTO daily_new_accounts (network, day, new_count) VALUES (?1, ?2, ?3)",
            rusqlite::params!["mainnet", "2022-03-01", 10],
        )
        .unwrap();
    }
}
