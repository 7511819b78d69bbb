//! tally-server library.
//!
//! Stateless HTTP surface over [`tally_store::TodoStore`]: every handler
//! authenticates the caller, runs the minimal sequence of key-value
//! operations, and converts any failure into the JSON error envelope. No
//! handler talks to another; all coordination happens through the shared
//! key-value namespace.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use auth::Authenticator;
use tally_store::{KvStore, TodoStore};

/// Shared request context: the repository, the raw store handle (for the
/// health probe), and the token table.
#[derive(Clone)]
pub struct AppState {
    pub kv: Arc<dyn KvStore>,
    pub todos: TodoStore,
    pub auth: Authenticator,
}

impl AppState {
    #[must_use]
    pub fn new(kv: Arc<dyn KvStore>, auth: Authenticator) -> Self {
        Self {
            todos: TodoStore::new(kv.clone()),
            kv,
            auth,
        }
    }
}

/// Build the application router.
///
/// Exposed so tests can serve the exact production routing table on an
/// ephemeral port.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/:id",
            get(handlers::get_todo)
                .patch(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .with_state(state)
}
