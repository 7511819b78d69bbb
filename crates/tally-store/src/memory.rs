//! In-process key-value backend.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::kv::{KvError, KvStore};

/// In-memory [`KvStore`] backing single-node deployments and tests.
///
/// A `BTreeMap` under an `RwLock`: reads share the lock, writes take it
/// exclusively, and the ordered map gives `keys` its lexicographic order for
/// free. State lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKv {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys. Test-support accessor.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> KvError {
    KvError::Unavailable("store lock poisoned".to_string())
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), KvError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, KvError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryKv;
    use crate::kv::KvStore;

    #[tokio::test]
    async fn set_get_delete_cycle() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("a").await.unwrap(), None);

        kv.set("a", b"1".to_vec()).await.unwrap();
        assert_eq!(kv.get("a").await.unwrap(), Some(b"1".to_vec()));

        kv.set("a", b"2".to_vec()).await.unwrap();
        assert_eq!(kv.get("a").await.unwrap(), Some(b"2".to_vec()));

        kv.delete("a").await.unwrap();
        assert_eq!(kv.get("a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_of_absent_key_is_ok() {
        let kv = MemoryKv::new();
        kv.delete("never-written").await.unwrap();
    }

    #[tokio::test]
    async fn keys_filters_by_prefix_in_order() {
        let kv = MemoryKv::new();
        for key in ["todos:bob:1", "todos:alice:2", "todos:alice:1", "other"] {
            kv.set(key, b"x".to_vec()).await.unwrap();
        }

        let keys = kv.keys("todos:alice:").await.unwrap();
        assert_eq!(keys, vec!["todos:alice:1", "todos:alice:2"]);

        let all = kv.keys("").await.unwrap();
        assert_eq!(all.len(), 4);
    }
}
