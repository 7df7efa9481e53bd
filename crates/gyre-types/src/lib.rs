//! Shared types for the Gyre keyspace cluster.
//!
//! This crate defines the types used across the Gyre workspace: cluster
//! events ([`ClusterEvent`]) and configuration ([`ClusterConfig`]).
//! Physical nodes are identified by plain string names and records by
//! string keys; both are chosen by the caller and treated as opaque.

use serde::{Deserialize, Serialize};

/// Events emitted by the cluster when membership changes.
///
/// Subscribers (diagnostics, the audit driver, etc.) receive these on the
/// cluster's broadcast channel after the corresponding membership operation
/// has fully completed, migration included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusterEvent {
    /// A node joined the cluster and migration to it has finished.
    NodeJoined {
        /// Name of the new node.
        name: String,
        /// Number of records that moved onto the new node.
        records_moved: u64,
    },
    /// A node left the cluster and its records have been re-homed.
    NodeLeft {
        /// Name of the departed node.
        name: String,
        /// Number of records that moved off the departed node.
        records_moved: u64,
    },
}

/// Configuration for a cluster, fixed at construction.
///
/// The vnode count and the ring hash function (chosen separately, at ring
/// construction) are immutable for the lifetime of a cluster instance:
/// changing either would silently re-home every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Virtual nodes per physical node.
    ///
    /// More vnodes smooth the load distribution at the cost of a larger
    /// ring index. Production deployments typically use 100–1000.
    pub vnodes_per_node: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            vnodes_per_node: 128,
        }
    }
}

impl ClusterConfig {
    /// Create a config with an explicit vnode count.
    ///
    /// Clamps zero to one: a node with no ring presence could never own
    /// anything, which the rest of the system does not model.
    pub fn with_vnodes(vnodes_per_node: u32) -> Self {
        Self {
            vnodes_per_node: vnodes_per_node.max(1),
        }
    }
}
