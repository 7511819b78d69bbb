//! Snapshot-and-restore optimistic collection.
//!
//! Every mutating action applies its local change immediately, issues the
//! request, and on failure restores the exact prior snapshot and surfaces an
//! error message for the banner. Creation inserts a locally synthesized
//! `temp-…` record that the server's canonical document replaces (matched by
//! the temporary id) once the create call returns. One in-memory snapshot,
//! one revert; concurrent edits are never merged.

use chrono::Utc;

use tally_core::item::{NewTodo, Priority, TodoItem, TodoPatch};

use crate::api::TodoApi;

/// The client-visible TODO collection.
pub struct OptimisticList<A: TodoApi> {
    api: A,
    todos: Vec<TodoItem>,
    error: Option<String>,
}

impl<A: TodoApi> OptimisticList<A> {
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            todos: Vec::new(),
            error: None,
        }
    }

    /// Currently visible items, in local display order.
    #[must_use]
    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    /// Message for the error banner, if the last failing action set one.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Replace the collection from the server. Returns `false` (and keeps
    /// the current items) when the fetch fails.
    pub fn refresh(&mut self) -> bool {
        match self.api.list() {
            Ok(todos) => {
                self.todos = todos;
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                false
            }
        }
    }

    /// Add a new item: a temporary record appears at the end of the list
    /// immediately and is swapped for the server's document on success.
    pub fn add(&mut self, title: &str, description: &str) -> bool {
        self.error = None;

        let now = Utc::now();
        let temp = TodoItem {
            id: format!("temp-{}", now.timestamp_millis()),
            title: title.to_string(),
            description: description.to_string(),
            completed: false,
            priority: Priority::Medium,
            created_at: now,
            updated_at: now,
            user_id: String::new(),
        };
        let temp_id = temp.id.clone();

        let previous = self.todos.clone();
        self.todos.push(temp);

        let input = NewTodo {
            title: title.to_string(),
            description: Some(description.to_string()),
            priority: Some(Priority::Medium),
        };
        match self.api.create(&input) {
            Ok(doc) => {
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == temp_id) {
                    *slot = doc;
                }
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.todos = previous;
                false
            }
        }
    }

    /// Flip an item's completion state. No-op on an unknown id.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(completed) = self
            .todos
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.completed)
        else {
            return false;
        };

        let previous = self.todos.clone();
        if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
            todo.completed = !completed;
            todo.updated_at = Utc::now();
        }

        match self.api.update(id, &TodoPatch::completed(!completed)) {
            Ok(doc) => {
                if let Some(slot) = self.todos.iter_mut().find(|t| t.id == id) {
                    *slot = doc;
                }
                true
            }
            Err(err) => {
                self.error = Some(err.to_string());
                self.todos = previous;
                false
            }
        }
    }

    /// Remove an item from the list and the server.
    pub fn remove(&mut self, id: &str) -> bool {
        let previous = self.todos.clone();
        self.todos.retain(|t| t.id != id);

        match self.api.delete(id) {
            Ok(()) => true,
            Err(err) => {
                self.error = Some(err.to_string());
                self.todos = previous;
                false
            }
        }
    }
}
