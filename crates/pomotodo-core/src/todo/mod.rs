//! To-do list over a record store.
//!
//! [`TodoList`] keeps a local copy of the `todos` collection. Every
//! mutation goes to the store first; the local list only changes once the
//! store has accepted it, and a failed call leaves it untouched.

mod store;

pub use store::{MemoryStore, RecordStore};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Fields for a record that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub text: String,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

/// Partial update; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    pub fn apply(&self, todo: &mut Todo) {
        if let Some(text) = &self.text {
            todo.text = text.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
    }
}

/// Local view of the `todos` collection.
pub struct TodoList<S: RecordStore> {
    store: S,
    items: Vec<Todo>,
}

impl<S: RecordStore> TodoList<S> {
    /// An empty list; call [`fetch`](Self::fetch) to load records.
    pub fn new(store: S) -> Self {
        Self {
            store,
            items: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Replace the local list with the store's records, newest first.
    pub fn fetch(&mut self) -> Result<&[Todo]> {
        self.items = self.store.list().inspect_err(|e| {
            tracing::warn!(error = %e, "failed to fetch todos");
        })?;
        Ok(&self.items)
    }

    /// Create a record from trimmed `text`. Blank text creates nothing and
    /// returns `Ok(None)`. The new record is appended to the local list.
    pub fn add(&mut self, text: &str) -> Result<Option<&Todo>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let record = self.store.create(&NewTodo::new(text)).inspect_err(|e| {
            tracing::warn!(error = %e, "failed to add todo");
        })?;
        self.items.push(record);
        Ok(self.items.last())
    }

    /// Flip the completed flag of a listed record.
    pub fn toggle(&mut self, id: &str) -> Result<&Todo> {
        let index = self.index_of(id)?;
        let patch = TodoPatch::completed(!self.items[index].completed);
        self.replace(index, &patch)
    }

    /// Replace the text of a listed record with trimmed `text`. Blank text
    /// leaves the record unchanged and returns `Ok(None)`.
    pub fn edit(&mut self, id: &str, text: &str) -> Result<Option<&Todo>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let index = self.index_of(id)?;
        self.replace(index, &TodoPatch::text(text)).map(Some)
    }

    /// Delete a record; it leaves the local list only after the store
    /// confirms.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.store.delete(id).inspect_err(|e| {
            tracing::warn!(error = %e, id, "failed to delete todo");
        })?;
        self.items.retain(|t| t.id != id);
        Ok(())
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|t| t.completed).count()
    }

    /// Share of completed records, 0.0 .. 100.0; zero for an empty list.
    pub fn progress_pct(&self) -> f64 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.completed_count() as f64 / self.items.len() as f64 * 100.0
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.items
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() }.into())
    }

    fn replace(&mut self, index: usize, patch: &TodoPatch) -> Result<&Todo> {
        let id = self.items[index].id.clone();
        let updated = self.store.update(&id, patch).inspect_err(|e| {
            tracing::warn!(error = %e, id = %id, "failed to update todo");
        })?;
        self.items[index] = updated;
        Ok(&self.items[index])
    }
}
