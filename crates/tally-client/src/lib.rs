//! tally-client library.
//!
//! Two layers a UI builds on:
//!
//! - [`api`] — [`api::ApiClient`], a blocking HTTP client for the tally
//!   server, behind the [`api::TodoApi`] trait.
//! - [`optimistic`] — [`optimistic::OptimisticList`], the
//!   snapshot-and-restore collection that applies every mutation locally
//!   before the server confirms it.

pub mod api;
pub mod optimistic;

pub use api::{ApiClient, ApiError, TodoApi};
pub use optimistic::OptimisticList;
