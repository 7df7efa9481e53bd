//! Error types for the ring index.

/// Errors produced by ring index operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// `resolve` was called with no vnodes registered.
    ///
    /// No owner can be determined; the caller must retry after at least
    /// one node has been inserted.
    #[error("ring is empty: no nodes registered")]
    EmptyRing,

    /// The node already has positions on the ring.
    ///
    /// Callers must remove a node before re-inserting it.
    #[error("node already on ring: {0}")]
    DuplicateNode(String),

    /// A computed vnode position is already held by a different node.
    ///
    /// Insertion is rejected rather than overwriting the existing owner;
    /// the ring is left untouched.
    #[error("vnode position {position} of node {candidate} already held by {holder}")]
    DuplicateVNode {
        /// The colliding ring position.
        position: u64,
        /// The node currently holding the position.
        holder: String,
        /// The node whose insertion collided.
        candidate: String,
    },
}
