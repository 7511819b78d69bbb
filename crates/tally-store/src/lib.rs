//! tally-store library.
//!
//! Storage layer for the TODO service, in two halves:
//!
//! - [`kv`] — the [`kv::KvStore`] trait: the minimal get/set/delete/keys
//!   contract an external key-value service offers, plus JSON helpers. The
//!   in-process [`memory::MemoryKv`] implementation backs single-node
//!   deployments and tests.
//! - [`todos`] — [`todos::TodoStore`], the repository that emulates
//!   list/query semantics over that contract by maintaining a per-user index
//!   record alongside the item records.
//!
//! Nothing here is transactional: the index and item writes of a mutation are
//! separate operations, and the repository documents the windows where they
//! can diverge.

pub mod kv;
pub mod memory;
pub mod todos;

pub use kv::{KvError, KvStore};
pub use memory::MemoryKv;
pub use todos::{StoreError, TodoStore};
