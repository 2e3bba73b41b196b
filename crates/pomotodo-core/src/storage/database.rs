//! SQLite-backed record store for the `todos` collection.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{data_dir, migrations};
use crate::error::{CoreError, StoreError};
use crate::todo::{NewTodo, RecordStore, Todo, TodoPatch};

/// SQLite database holding the to-do records.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/pomotodo/pomotodo.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("pomotodo.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::migrate(&conn).map_err(|e| StoreError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn find(&self, id: &str) -> Result<Todo, StoreError> {
        self.conn
            .query_row(
                "SELECT id, text, completed, created, updated FROM todos WHERE id = ?1",
                params![id],
                row_to_todo,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

impl RecordStore for Database {
    fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, completed, created, updated
             FROM todos
             ORDER BY created DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], row_to_todo)?;
        let mut todos = Vec::new();
        for row in rows {
            todos.push(row?);
        }
        Ok(todos)
    }

    fn create(&self, new: &NewTodo) -> Result<Todo, StoreError> {
        let now = Utc::now();
        let todo = Todo {
            id: Uuid::new_v4().to_string(),
            text: new.text.clone(),
            completed: new.completed,
            created: now,
            updated: now,
        };
        self.conn.execute(
            "INSERT INTO todos (id, text, completed, created, updated)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                todo.id,
                todo.text,
                todo.completed,
                timestamp(&todo.created),
                timestamp(&todo.updated),
            ],
        )?;
        tracing::debug!(id = %todo.id, "todo created");
        Ok(todo)
    }

    fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo, StoreError> {
        let mut todo = self.find(id)?;
        patch.apply(&mut todo);
        todo.updated = Utc::now();
        self.conn.execute(
            "UPDATE todos SET text = ?2, completed = ?3, updated = ?4 WHERE id = ?1",
            params![todo.id, todo.text, todo.completed, timestamp(&todo.updated)],
        )?;
        Ok(todo)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM todos WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(())
    }
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

fn row_to_todo(row: &Row<'_>) -> rusqlite::Result<Todo> {
    let created: String = row.get(3)?;
    let updated: String = row.get(4)?;
    Ok(Todo {
        id: row.get(0)?,
        text: row.get(1)?,
        completed: row.get(2)?,
        created: parse_timestamp(3, &created)?,
        updated: parse_timestamp(4, &updated)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_list() {
        let db = Database::open_in_memory().unwrap();
        db.create(&NewTodo::new("first")).unwrap();
        db.create(&NewTodo::new("second")).unwrap();
        let todos = db.list().unwrap();
        assert_eq!(todos.len(), 2);
        assert_eq!(todos[0].text, "second");
        assert_eq!(todos[1].text, "first");
    }

    #[test]
    fn update_applies_patch() {
        let db = Database::open_in_memory().unwrap();
        let todo = db.create(&NewTodo::new("read")).unwrap();
        let updated = db.update(&todo.id, &TodoPatch::completed(true)).unwrap();
        assert!(updated.completed);
        assert_eq!(updated.text, "read");
        assert!(updated.updated >= todo.updated);
        assert!(db.list().unwrap()[0].completed);
    }

    #[test]
    fn missing_records_are_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            db.update("ghost", &TodoPatch::text("x")),
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            db.delete("ghost"),
            Err(StoreError::NotFound { .. })
        ));
    }
}
