use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use uuid::Uuid;

use super::{NewTodo, Todo, TodoPatch};
use crate::error::StoreError;

/// CRUD capability over the `todos` collection.
///
/// The list treats the store as opaque: whatever record comes back from a
/// create or update replaces its local copy.
pub trait RecordStore {
    /// All records, newest first.
    fn list(&self) -> Result<Vec<Todo>, StoreError>;

    fn create(&self, new: &NewTodo) -> Result<Todo, StoreError>;

    fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo, StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn list(&self) -> Result<Vec<Todo>, StoreError> {
        (**self).list()
    }

    fn create(&self, new: &NewTodo) -> Result<Todo, StoreError> {
        (**self).create(new)
    }

    fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo, StoreError> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        (**self).delete(id)
    }
}

/// Volatile store for tests and one-off sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn list(&self) -> Result<Vec<Todo>, StoreError> {
        let mut records = self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        records.sort_by(|a, b| b.created.cmp(&a.created));
        Ok(records)
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
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(todo.clone());
        Ok(todo)
    }

    fn update(&self, id: &str, patch: &TodoPatch) -> Result<Todo, StoreError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let todo = records
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        patch.apply(todo);
        todo.updated = Utc::now();
        Ok(todo.clone())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|t| t.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        Ok(())
    }
}
