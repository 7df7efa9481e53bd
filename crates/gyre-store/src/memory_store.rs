//! In-memory record store.

use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use tracing::trace;

use crate::error::StoreError;
use crate::traits::RecordStore;

/// In-memory record store backed by a `RwLock<HashMap>`.
///
/// The default shard backend for cluster nodes. Interior locking makes it
/// safe to share behind an `Arc`; cluster-wide consistency during
/// migration is the membership manager's responsibility, not this store's.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, key: String, value: Bytes) -> Result<(), StoreError> {
        let mut map = self.records.write().expect("lock poisoned");
        trace!(key = %key, size = value.len(), "storing record");
        map.insert(key, value);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    async fn take(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        let mut map = self.records.write().expect("lock poisoned");
        let value = map.remove(key);
        if value.is_some() {
            trace!(key = %key, "record taken");
        }
        Ok(value)
    }

    async fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }

    async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.keys().cloned().collect())
    }

    async fn entries(&self) -> Result<Vec<(String, Bytes)>, StoreError> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    async fn len(&self) -> Result<usize, StoreError> {
        let map = self.records.read().expect("lock poisoned");
        Ok(map.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryStore::new();
        store
            .put("user_1".to_string(), Bytes::from_static(b"data"))
            .await
            .unwrap();

        let value = store.get("user_1").await.unwrap();
        assert_eq!(value, Some(Bytes::from_static(b"data")));
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_replaces_existing_value() {
        let store = MemoryStore::new();
        store
            .put("k".to_string(), Bytes::from_static(b"old"))
            .await
            .unwrap();
        store
            .put("k".to_string(), Bytes::from_static(b"new"))
            .await
            .unwrap();

        assert_eq!(store.get("k").await.unwrap(), Some(Bytes::from_static(b"new")));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_take_removes_and_returns() {
        let store = MemoryStore::new();
        store
            .put("k".to_string(), Bytes::from_static(b"v"))
            .await
            .unwrap();

        let taken = store.take("k").await.unwrap();
        assert_eq!(taken, Some(Bytes::from_static(b"v")));
        assert!(!store.contains("k").await.unwrap());
        assert_eq!(store.take("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_and_len() {
        let store = MemoryStore::new();
        for i in 0..3 {
            store
                .put(format!("key_{i}"), Bytes::from_static(b"v"))
                .await
                .unwrap();
        }

        let mut keys = store.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["key_0", "key_1", "key_2"]);
        assert_eq!(store.len().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_entries_snapshot() {
        let store = MemoryStore::new();
        store
            .put("a".to_string(), Bytes::from_static(b"1"))
            .await
            .unwrap();
        store
            .put("b".to_string(), Bytes::from_static(b"2"))
            .await
            .unwrap();

        let mut entries = store.entries().await.unwrap();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), Bytes::from_static(b"1")),
                ("b".to_string(), Bytes::from_static(b"2")),
            ]
        );

        // The snapshot is detached from later mutation.
        store.take("a").await.unwrap();
        assert_eq!(entries.len(), 2);
    }
}
