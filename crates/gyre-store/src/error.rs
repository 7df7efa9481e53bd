//! Error types for record storage.

/// Errors that can occur during record store operations.
///
/// [`MemoryStore`](crate::MemoryStore) itself never fails, but the trait
/// is fallible so substituted backends (file- or index-backed) can surface
/// their failures through the same seam.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error from a disk-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A backend-specific failure.
    #[error("store backend error: {0}")]
    Backend(String),
}
