//! Request handlers.
//!
//! Each handler is the full story of its route: authenticate (via the
//! [`AuthUser`] extractor), run the store sequence, shape the response.
//! Handlers never talk to each other.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use tally_core::item::{NewTodo, TodoItem, TodoPatch};

use crate::AppState;
use crate::auth::AuthUser;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct TodoList {
    pub todos: Vec<TodoItem>,
}

#[derive(Debug, Serialize)]
pub struct Doc {
    pub doc: TodoItem,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// `GET /todos` — all of the caller's items, most recently updated first.
pub async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<TodoList>, ApiError> {
    let todos = state
        .todos
        .list(&user.id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch TODOs"))?;
    Ok(Json(TodoList { todos }))
}

/// `POST /todos` — create an item; 201 with the stored document.
pub async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NewTodo>,
) -> Result<(StatusCode, Json<Doc>), ApiError> {
    let doc = state
        .todos
        .create(&user.id, input)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to create TODO"))?;
    Ok((StatusCode::CREATED, Json(Doc { doc })))
}

/// `GET /todos/{id}` — a single owned item.
pub async fn get_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Doc>, ApiError> {
    let doc = state
        .todos
        .get(&user.id, &id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to fetch TODO"))?;
    Ok(Json(Doc { doc }))
}

/// `PATCH /todos/{id}` — merge partial fields onto an owned item.
pub async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(patch): Json<TodoPatch>,
) -> Result<Json<Doc>, ApiError> {
    let doc = state
        .todos
        .update(&user.id, &id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to update TODO"))?;
    Ok(Json(Doc { doc }))
}

/// `DELETE /todos/{id}` — remove an owned item and its index entry.
pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    state
        .todos
        .delete(&user.id, &id)
        .await
        .map_err(|e| ApiError::from_store(e, "Failed to delete TODO"))?;
    Ok(Json(Deleted { success: true }))
}

/// `GET /healthz` — unauthenticated liveness probe: one write/read/delete
/// round-trip against the store.
pub async fn healthz(State(state): State<AppState>) -> Result<Json<Health>, ApiError> {
    let probe = |e: tally_store::KvError| ApiError::Internal {
        context: "KV health check failed",
        details: e.to_string(),
    };

    state
        .kv
        .set("health:probe", b"ok".to_vec())
        .await
        .map_err(probe)?;
    let read = state.kv.get("health:probe").await.map_err(probe)?;
    state.kv.delete("health:probe").await.map_err(probe)?;

    if matches!(read.as_deref(), Some(b"ok")) {
        Ok(Json(Health { status: "ok" }))
    } else {
        Err(ApiError::Internal {
            context: "KV health check failed",
            details: "probe value did not round-trip".to_string(),
        })
    }
}
