//! The ring index: sorted vnode positions with owner lookup.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use tracing::debug;

use crate::error::RingError;
use crate::hasher::{Blake3Hasher, RingHasher};

/// Compute a node's vnode positions: `hash("{name}#{index}")` for each
/// index in `[0, count)`.
///
/// Pure and deterministic for a given hasher. Returned as a set — if two
/// indexes of the same node collide (practically impossible with the
/// default hasher), the position appears once.
pub fn vnode_positions(hasher: &dyn RingHasher, name: &str, count: u32) -> BTreeSet<u64> {
    (0..count)
        .map(|i| hasher.position(format!("{name}#{i}").as_bytes()))
        .collect()
}

/// Consistent hashing ring mapping key hashes to node names.
///
/// Keeps the vnode positions sorted at all times (a `BTreeMap` keyed by
/// position), trading a small insertion cost for O(log V·N) resolution —
/// the operation executed once per read and once per key during migration
/// scans. The position map and the per-node position sets always have
/// identical contents; mutations are applied atomically from the point of
/// view of any caller (a failed insert changes nothing).
#[derive(Clone)]
pub struct Ring {
    /// Vnode positions: ring position → owning node name.
    vnodes: BTreeMap<u64, String>,
    /// Per-node positions, for removal and diagnostics.
    nodes: HashMap<String, BTreeSet<u64>>,
    /// Vnodes per physical node.
    vnodes_per_node: u32,
    /// Hash function for vnode placement and key resolution.
    hasher: Arc<dyn RingHasher>,
}

impl Ring {
    /// Create an empty ring with the default BLAKE3 hasher.
    pub fn new(vnodes_per_node: u32) -> Self {
        Self::with_hasher(vnodes_per_node, Arc::new(Blake3Hasher))
    }

    /// Create an empty ring with an explicit hash function.
    pub fn with_hasher(vnodes_per_node: u32, hasher: Arc<dyn RingHasher>) -> Self {
        Self {
            vnodes: BTreeMap::new(),
            nodes: HashMap::new(),
            vnodes_per_node: vnodes_per_node.max(1),
            hasher,
        }
    }

    /// Insert a node's vnodes into the ring.
    ///
    /// Fails with [`RingError::DuplicateNode`] if the node already has
    /// positions (remove before re-inserting), or with
    /// [`RingError::DuplicateVNode`] if any computed position is held by a
    /// different node. On error the ring is unchanged.
    pub fn insert_node(&mut self, name: &str) -> Result<(), RingError> {
        if self.nodes.contains_key(name) {
            return Err(RingError::DuplicateNode(name.to_string()));
        }

        let positions = vnode_positions(self.hasher.as_ref(), name, self.vnodes_per_node);

        // Check every position before touching the map.
        for pos in &positions {
            if let Some(holder) = self.vnodes.get(pos) {
                return Err(RingError::DuplicateVNode {
                    position: *pos,
                    holder: holder.clone(),
                    candidate: name.to_string(),
                });
            }
        }

        for pos in &positions {
            self.vnodes.insert(*pos, name.to_string());
        }
        debug!(node = name, vnodes = positions.len(), "inserted node into ring");
        self.nodes.insert(name.to_string(), positions);
        Ok(())
    }

    /// Remove every position owned by `name`.
    ///
    /// Unknown names are a no-op; membership validation happens a layer up.
    pub fn remove_node(&mut self, name: &str) {
        if let Some(positions) = self.nodes.remove(name) {
            for pos in &positions {
                self.vnodes.remove(pos);
            }
            debug!(node = name, vnodes = positions.len(), "removed node from ring");
        }
    }

    /// Resolve a key hash to the owning node name.
    ///
    /// Returns the owner of the first vnode at or after `key_hash`; if the
    /// hash exceeds every position, wraps around to the smallest one.
    pub fn resolve(&self, key_hash: u64) -> Result<&str, RingError> {
        self.vnodes
            .range(key_hash..)
            .next()
            .or_else(|| self.vnodes.iter().next())
            .map(|(_, name)| name.as_str())
            .ok_or(RingError::EmptyRing)
    }

    /// Resolve a string key to the owning node name.
    ///
    /// The single source of truth for "who owns key K": external readers
    /// and migration scans both go through here, so the two can never
    /// disagree.
    pub fn resolve_key(&self, key: &str) -> Result<&str, RingError> {
        self.resolve(self.hasher.position(key.as_bytes()))
    }

    /// Hash a key to its ring position without resolving it.
    pub fn key_position(&self, key: &str) -> u64 {
        self.hasher.position(key.as_bytes())
    }

    /// Whether the node has positions on the ring.
    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Number of physical nodes on the ring.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total number of vnodes on the ring.
    pub fn vnode_count(&self) -> usize {
        self.vnodes.len()
    }

    /// Number of vnodes held by a specific node (0 if absent).
    pub fn vnode_count_of(&self, name: &str) -> usize {
        self.nodes.get(name).map_or(0, BTreeSet::len)
    }

    /// Names of all nodes on the ring, sorted.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Configured vnodes per node.
    pub fn vnodes_per_node(&self) -> u32 {
        self.vnodes_per_node
    }
}

impl std::fmt::Debug for Ring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("nodes", &self.nodes.len())
            .field("vnodes", &self.vnodes.len())
            .field("vnodes_per_node", &self.vnodes_per_node)
            .finish_non_exhaustive()
    }
}
