//! tally-core library.
//!
//! Domain model shared by the store, server, and client crates: the
//! [`item::TodoItem`] record, its input/patch types, and the key namespace
//! every store operation addresses.
//!
//! # Conventions
//!
//! - **Errors**: library seams return typed `thiserror` enums; binaries use
//!   `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`).

pub mod item;
pub mod keys;

pub use item::{NewTodo, ParseEnumError, Priority, TodoItem, TodoPatch, ValidationError};
