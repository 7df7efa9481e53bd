//! Consistent hashing ring with virtual nodes.
//!
//! This crate implements the ring index that maps record keys to node names.
//! Each physical node gets multiple positions on a u64 ring (virtual nodes),
//! derived as `hash("{name}#{index}")`. A key belongs to the first vnode at
//! or after the key's own hash position, wrapping past the maximum position
//! back to the smallest — so when membership changes, only the keys in the
//! arcs adjacent to the affected vnodes change owner.
//!
//! The hash function is a construction-time parameter (see [`RingHasher`]);
//! the default is BLAKE3 truncated to 8 bytes. More vnodes per node = more
//! uniform distribution.

mod error;
mod hasher;
mod ring;

pub use error::RingError;
pub use hasher::{Blake3Hasher, RingHasher};
pub use ring::{vnode_positions, Ring};
