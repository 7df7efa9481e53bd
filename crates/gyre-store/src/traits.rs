//! Core trait for per-node record storage.

use bytes::Bytes;

use crate::error::StoreError;

/// Trait for one node's local key/value shard.
///
/// All implementations must be `Send + Sync` for use across async tasks.
/// Values are passed as [`Bytes`] so moves between stores during migration
/// are cheap reference-count bumps rather than copies.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    /// Store a record, replacing any existing value for the key.
    async fn put(&self, key: String, value: Bytes) -> Result<(), StoreError>;

    /// Retrieve a record by key. Returns `None` if not present.
    async fn get(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Remove a record and return its value, if present.
    ///
    /// This is the migration primitive: a move is `take` from the source
    /// followed by `put` on the destination.
    async fn take(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Check whether a key is present.
    async fn contains(&self, key: &str) -> Result<bool, StoreError>;

    /// List all stored keys.
    async fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Snapshot all records.
    ///
    /// Used by node removal, which must capture the departing node's
    /// records before the ring changes underneath them.
    async fn entries(&self) -> Result<Vec<(String, Bytes)>, StoreError>;

    /// Number of records currently stored.
    async fn len(&self) -> Result<usize, StoreError>;
}
