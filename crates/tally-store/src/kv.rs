//! The key-value service contract.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Errors surfaced by a key-value backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KvError {
    /// The backing service could not be reached or refused the operation.
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),

    /// A stored value failed to encode or decode as the expected JSON shape.
    #[error("corrupt value at '{key}': {message}")]
    Codec { key: String, message: String },
}

/// Minimal contract offered by the external key-value service: opaque byte
/// values under string keys, no transactions, no secondary indexes.
///
/// All operations are async and may suspend while awaiting the remote store.
/// Callers sequence them explicitly; the service promises nothing about
/// concurrent writers beyond last-writer-wins per key.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Fetch the value at `key`. `Ok(None)` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError>;

    /// Write `value` at `key`, replacing any previous value.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), KvError>;

    /// List keys beginning with `prefix`, in lexicographic order.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, KvError>;
}

/// Fetch and decode a JSON value. `Ok(None)` when the key is absent.
pub async fn get_json<T: DeserializeOwned>(
    kv: &dyn KvStore,
    key: &str,
) -> Result<Option<T>, KvError> {
    match kv.get(key).await? {
        None => Ok(None),
        Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
            KvError::Codec {
                key: key.to_string(),
                message: e.to_string(),
            }
        }),
    }
}

/// Encode `value` as JSON and write it at `key`.
pub async fn set_json<T: Serialize + Sync>(
    kv: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), KvError> {
    let bytes = serde_json::to_vec(value).map_err(|e| KvError::Codec {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    kv.set(key, bytes).await
}
