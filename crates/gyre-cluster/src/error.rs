//! Error types for cluster membership operations.
//!
//! All variants are recoverable by the caller; none are fatal to the
//! process. A membership operation that returns an error other than
//! [`ClusterError::Cancelled`] has performed no mutation.

use gyre_ring::RingError;
use gyre_store::StoreError;

/// Errors produced by the cluster membership manager.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    /// `resolve` was called with no nodes in the cluster, or a removal
    /// would have left records with no possible owner.
    #[error("no owner can be determined: the ring is empty")]
    EmptyRing,

    /// `add_node` was called for a name that is already active.
    /// No mutation was performed.
    #[error("node already exists: {0}")]
    NodeAlreadyExists(String),

    /// `remove_node` was called for a name that is not active.
    /// No mutation was performed.
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// A migration scan was cancelled between key iterations.
    ///
    /// There is no rollback: the ring already reflects the new topology
    /// and some records may sit on the wrong node. Run a placement audit
    /// and re-apply the membership change before trusting reads again.
    #[error("membership operation cancelled mid-migration")]
    Cancelled,

    /// A ring index error (e.g. a cross-node vnode position collision).
    #[error(transparent)]
    Ring(#[from] RingError),

    /// An error from a node's record store backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}
