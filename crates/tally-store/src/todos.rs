//! The index-maintaining TODO repository.
//!
//! The key-value service has no query layer, so "list all TODOs for user X"
//! is emulated with a per-user index record: an ordered list of item ids kept
//! alongside the individually keyed item records. Every mutation performs the
//! index and item writes as separate, non-transactional operations:
//!
//! - create: item written first, then the index — a crash in between leaves
//!   an item the index does not reference.
//! - delete: item removed first, then the index — a crash in between leaves a
//!   dangling index entry, which [`TodoStore::list`] tolerates by skipping.
//!
//! Concurrent mutations by the same user race on the index record
//! (last-writer-wins full overwrite). [`TodoStore::rebuild_index`] recovers
//! from either divergence by rescanning the item namespace.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::{debug, warn};

use tally_core::item::{NewTodo, TodoItem, TodoPatch, ValidationError};
use tally_core::keys;

use crate::kv::{self, KvError, KvStore};

/// Errors surfaced by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    #[error("todo '{0}' not found")]
    NotFound(String),

    /// The record at the caller's key names a different owner. Unreachable
    /// through the HTTP surface (keys are namespaced by user); kept as a
    /// defense-in-depth check on the stored owner field.
    #[error("todo '{0}' belongs to another user")]
    Forbidden(String),

    #[error(transparent)]
    Kv(#[from] KvError),
}

/// Repository for one KV-backed TODO namespace.
///
/// Stateless apart from the store handle: every operation is a fresh sequence
/// of key-value calls, so the repository can be cloned freely into handlers.
#[derive(Clone)]
pub struct TodoStore {
    kv: Arc<dyn KvStore>,
}

impl TodoStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    async fn read_index(&self, user_id: &str) -> Result<Vec<String>, KvError> {
        let ids: Option<Vec<String>> =
            kv::get_json(self.kv.as_ref(), &keys::index_key(user_id)).await?;
        Ok(ids.unwrap_or_default())
    }

    async fn write_index(&self, user_id: &str, ids: &Vec<String>) -> Result<(), KvError> {
        kv::set_json(self.kv.as_ref(), &keys::index_key(user_id), ids).await
    }

    /// All items owned by `user_id`, sorted by `updatedAt` descending.
    ///
    /// Item records are fetched concurrently. Index entries whose record no
    /// longer exists are skipped; any store failure fails the whole list.
    pub async fn list(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError> {
        let ids = self.read_index(user_id).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let fetches = ids.iter().map(|id| {
            let key = keys::item_key(user_id, id);
            async move { kv::get_json::<TodoItem>(self.kv.as_ref(), &key).await }
        });
        let fetched = try_join_all(fetches).await?;

        let mut todos: Vec<TodoItem> = fetched.into_iter().flatten().collect();
        todos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        debug!(user = user_id, count = todos.len(), "listed todos");
        Ok(todos)
    }

    /// Create an item from validated input and append it to the index.
    ///
    /// No writes happen when validation fails. The item record is written
    /// before the index update.
    pub async fn create(&self, user_id: &str, input: NewTodo) -> Result<TodoItem, StoreError> {
        let todo = TodoItem::create(user_id, input, Utc::now())?;

        kv::set_json(
            self.kv.as_ref(),
            &keys::item_key(user_id, &todo.id),
            &todo,
        )
        .await?;

        let mut ids = self.read_index(user_id).await?;
        if !ids.iter().any(|id| *id == todo.id) {
            ids.push(todo.id.clone());
        }
        self.write_index(user_id, &ids).await?;

        debug!(user = user_id, id = %todo.id, "created todo");
        Ok(todo)
    }

    async fn fetch_owned(&self, user_id: &str, id: &str) -> Result<TodoItem, StoreError> {
        let todo: TodoItem = kv::get_json(self.kv.as_ref(), &keys::item_key(user_id, id))
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if todo.user_id != user_id {
            warn!(user = user_id, id, owner = %todo.user_id, "owner mismatch on stored record");
            return Err(StoreError::Forbidden(id.to_string()));
        }
        Ok(todo)
    }

    /// Fetch a single item, enforcing ownership.
    pub async fn get(&self, user_id: &str, id: &str) -> Result<TodoItem, StoreError> {
        self.fetch_owned(user_id, id).await
    }

    /// Merge `patch` onto an existing item and write it back.
    ///
    /// `id`, `userId`, and `createdAt` survive whatever the patch carries;
    /// `updatedAt` is set to now.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        patch: TodoPatch,
    ) -> Result<TodoItem, StoreError> {
        let mut todo = self.fetch_owned(user_id, id).await?;
        todo.apply_patch(patch, Utc::now());
        kv::set_json(self.kv.as_ref(), &keys::item_key(user_id, id), &todo).await?;
        debug!(user = user_id, id, "updated todo");
        Ok(todo)
    }

    /// Remove an item record and drop its id from the index.
    pub async fn delete(&self, user_id: &str, id: &str) -> Result<(), StoreError> {
        self.fetch_owned(user_id, id).await?;

        self.kv.delete(&keys::item_key(user_id, id)).await?;

        let mut ids = self.read_index(user_id).await?;
        ids.retain(|entry| entry != id);
        self.write_index(user_id, &ids).await?;

        debug!(user = user_id, id, "deleted todo");
        Ok(())
    }

    /// Rebuild a user's index from the item namespace.
    ///
    /// Recovers from the non-atomic windows above: rescans every record under
    /// the user's item prefix, keeps those the user actually owns, orders
    /// them by `createdAt` ascending (insertion order), and overwrites the
    /// index. Undecodable records are skipped with a warning rather than
    /// failing the rebuild. Returns the rebuilt id list.
    pub async fn rebuild_index(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let prefix = keys::item_prefix(user_id);
        let item_keys = self.kv.keys(&prefix).await?;

        let mut owned: Vec<TodoItem> = Vec::with_capacity(item_keys.len());
        for key in &item_keys {
            if keys::item_id_from_key(user_id, key).is_none() {
                continue;
            }
            match kv::get_json::<TodoItem>(self.kv.as_ref(), key).await {
                Ok(Some(todo)) if todo.user_id == user_id => owned.push(todo),
                Ok(_) => {}
                Err(KvError::Codec { key, message }) => {
                    warn!(%key, %message, "skipping undecodable record during index rebuild");
                }
                Err(e) => return Err(e.into()),
            }
        }

        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let ids: Vec<String> = owned.into_iter().map(|t| t.id).collect();
        self.write_index(user_id, &ids).await?;

        debug!(user = user_id, count = ids.len(), "rebuilt index");
        Ok(ids)
    }
}
