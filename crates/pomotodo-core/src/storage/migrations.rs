//! Versioned schema for the to-do database, applied on every open.

use rusqlite::{Connection, Result as SqliteResult};

/// Schema steps, in order. Entry `i` brings the database to version `i + 1`.
const STEPS: &[(&str, &str)] = &[
    (
        "todos collection",
        "CREATE TABLE IF NOT EXISTS todos (
            id        TEXT PRIMARY KEY,
            text      TEXT NOT NULL,
            completed INTEGER NOT NULL DEFAULT 0,
            created   TEXT NOT NULL,
            updated   TEXT NOT NULL
        );",
    ),
    (
        "newest-first listing index",
        "CREATE INDEX IF NOT EXISTS idx_todos_created ON todos(created);",
    ),
];

/// Version a fully migrated database reports.
pub const SCHEMA_VERSION: i32 = STEPS.len() as i32;

/// Bring `conn` up to [`SCHEMA_VERSION`]. Each step runs in its own
/// transaction together with the version bump.
///
/// # Errors
/// Returns the first SQLite error; steps already committed stay applied.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);")?;

    let from = get_schema_version(conn);
    for (version, (name, sql)) in (1..).zip(STEPS) {
        if version <= from {
            continue;
        }
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.execute("DELETE FROM schema_version", [])?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
        tx.commit()?;
        tracing::debug!(version, step = name, "applied migration");
    }
    Ok(())
}

/// Version recorded in `schema_version`, or 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> i32 {
    match conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0)) {
        Ok(version) => version,
        Err(rusqlite::Error::QueryReturnedNoRows) => 0,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read schema_version");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn partially_migrated_database_is_completed() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY);
             INSERT INTO schema_version (version) VALUES (1);",
        )
        .unwrap();
        conn.execute_batch(STEPS[0].1).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }

    #[test]
    fn v2_adds_created_index() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let exists: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_todos_created'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(exists, 1);
    }
}
