//! [`Cluster`] — shared cluster state and the membership protocols.

use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;
use gyre_ring::{Ring, RingHasher};
use gyre_store::{MemoryStore, RecordStore};
use gyre_types::{ClusterConfig, ClusterEvent};
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::ClusterError;
use crate::report::{JoinReport, LeaveReport};

/// Shared cluster state: the placement ring plus every node's local store.
///
/// Locking discipline: `membership` serializes `add_node`/`remove_node`
/// end-to-end (ring mutation, migration scan, and data moves), so two
/// concurrent membership changes can never claim the same record from the
/// same source. The ring itself sits behind its own `RwLock`, write-locked
/// only for the insert/remove sub-step — `resolve` readers keep flowing
/// during the (much slower) migration scan.
///
/// Node stores live in a `BTreeMap` so migration scans visit source nodes
/// in lexicographic name order, keeping per-source move counts reproducible
/// across runs.
pub struct Cluster {
    config: ClusterConfig,
    /// Placement ring. Mutated only under the membership lock.
    ring: RwLock<Ring>,
    /// Active nodes and their local record stores.
    nodes: RwLock<BTreeMap<String, Arc<dyn RecordStore>>>,
    /// Single-writer guard for membership operations.
    membership: Mutex<()>,
    /// Broadcast channel for membership events.
    event_tx: broadcast::Sender<ClusterEvent>,
}

impl Cluster {
    /// Create an empty cluster with the default ring hasher.
    pub fn new(config: ClusterConfig) -> Arc<Self> {
        Self::build(config, Ring::new(config.vnodes_per_node))
    }

    /// Create an empty cluster with an explicit ring hash function.
    pub fn with_hasher(config: ClusterConfig, hasher: Arc<dyn RingHasher>) -> Arc<Self> {
        Self::build(config, Ring::with_hasher(config.vnodes_per_node, hasher))
    }

    fn build(config: ClusterConfig, ring: Ring) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(256);
        Arc::new(Self {
            config,
            ring: RwLock::new(ring),
            nodes: RwLock::new(BTreeMap::new()),
            membership: Mutex::new(()),
            event_tx,
        })
    }

    /// Subscribe to membership events.
    pub fn subscribe(&self) -> broadcast::Receiver<ClusterEvent> {
        self.event_tx.subscribe()
    }

    /// The cluster's configuration.
    pub fn config(&self) -> ClusterConfig {
        self.config
    }

    /// Return a snapshot clone of the current placement ring.
    pub async fn ring(&self) -> Ring {
        self.ring.read().await.clone()
    }

    /// Resolve a key to the name of the node that currently owns it.
    pub async fn resolve(&self, key: &str) -> Result<String, ClusterError> {
        let ring = self.ring.read().await;
        ring.resolve_key(key)
            .map(str::to_string)
            .map_err(|_| ClusterError::EmptyRing)
    }

    /// Names of all active nodes, sorted.
    pub async fn node_names(&self) -> Vec<String> {
        self.nodes.read().await.keys().cloned().collect()
    }

    /// Number of active nodes.
    pub async fn node_count(&self) -> usize {
        self.nodes.read().await.len()
    }

    /// The record store of a specific node, if active.
    ///
    /// Diagnostics accessor; normal reads and writes should go through
    /// [`get_record`](Self::get_record) / [`put_record`](Self::put_record)
    /// so placement always follows the resolver.
    pub async fn store(&self, name: &str) -> Option<Arc<dyn RecordStore>> {
        self.nodes.read().await.get(name).cloned()
    }

    /// Per-node record counts, keyed by node name.
    pub async fn record_counts(&self) -> Result<BTreeMap<String, usize>, ClusterError> {
        let nodes = self.nodes.read().await;
        let mut counts = BTreeMap::new();
        for (name, store) in nodes.iter() {
            counts.insert(name.clone(), store.len().await?);
        }
        Ok(counts)
    }

    /// Total records across all nodes.
    pub async fn total_records(&self) -> Result<usize, ClusterError> {
        Ok(self.record_counts().await?.values().sum())
    }

    /// Map every stored key to the node actually holding it.
    ///
    /// Read-only scan over all stores, used by placement audits. A key
    /// duplicated across stores keeps the last node visited; the audit
    /// treats that as a mismatch on the other copy.
    pub async fn locations(&self) -> Result<BTreeMap<String, String>, ClusterError> {
        let nodes = self.nodes.read().await;
        let mut locations = BTreeMap::new();
        for (name, store) in nodes.iter() {
            for key in store.keys().await? {
                locations.insert(key, name.clone());
            }
        }
        Ok(locations)
    }

    /// Store a record on the node the resolver names for its key.
    pub async fn put_record(&self, key: String, value: Bytes) -> Result<(), ClusterError> {
        let owner = self.resolve(&key).await?;
        let store = self
            .store(&owner)
            .await
            .ok_or_else(|| ClusterError::NodeNotFound(owner.clone()))?;
        store.put(key, value).await?;
        Ok(())
    }

    /// Retrieve a record from the node the resolver names for its key.
    pub async fn get_record(&self, key: &str) -> Result<Option<Bytes>, ClusterError> {
        let owner = self.resolve(key).await?;
        let store = self
            .store(&owner)
            .await
            .ok_or_else(|| ClusterError::NodeNotFound(owner.clone()))?;
        Ok(store.get(key).await?)
    }

    // ------------------------------------------------------------------
    // Membership: node addition
    // ------------------------------------------------------------------

    /// Add a node with a fresh in-memory store, migrating the records it
    /// now owns from the rest of the cluster. Runs to completion.
    pub async fn add_node(&self, name: &str) -> Result<JoinReport, ClusterError> {
        self.add_node_with(name, Arc::new(MemoryStore::new()), &CancelToken::never())
            .await
    }

    /// Add a node with a caller-supplied store and cancellation token.
    ///
    /// The ring is updated to the final topology *before* any migration
    /// decision, so every per-key ownership question is answered against
    /// the new ring; candidate moves are collected before any store is
    /// mutated. Only records whose resolved owner became the new node are
    /// touched.
    pub async fn add_node_with(
        &self,
        name: &str,
        store: Arc<dyn RecordStore>,
        cancel: &CancelToken,
    ) -> Result<JoinReport, ClusterError> {
        let _guard = self.membership.lock().await;

        if self.nodes.read().await.contains_key(name) {
            return Err(ClusterError::NodeAlreadyExists(name.to_string()));
        }

        info!(node = name, "adding node");

        // Register the empty store first: once the ring names the new
        // node, a concurrent reader must find a store behind the name.
        self.nodes
            .write()
            .await
            .insert(name.to_string(), store.clone());

        // Ring mutation — the only sub-step that blocks resolvers.
        let inserted = self.ring.write().await.insert_node(name);
        if let Err(e) = inserted {
            // Unwind the store registration; nothing else changed.
            self.nodes.write().await.remove(name);
            return Err(e.into());
        }

        // Stable snapshot for the scan: only membership operations write
        // the ring, and we hold the membership lock.
        let ring = self.ring.read().await.clone();

        // Collect candidate moves before draining any store.
        let sources: Vec<(String, Arc<dyn RecordStore>)> = self
            .nodes
            .read()
            .await
            .iter()
            .filter(|(n, _)| n.as_str() != name)
            .map(|(n, s)| (n.clone(), s.clone()))
            .collect();

        let mut pending: Vec<(String, Arc<dyn RecordStore>, String)> = Vec::new();
        for (source_name, source_store) in &sources {
            for key in source_store.keys().await? {
                if cancel.is_cancelled() {
                    warn!(node = name, "node addition cancelled during ownership scan");
                    return Err(ClusterError::Cancelled);
                }
                if ring.resolve_key(&key)? == name {
                    pending.push((source_name.clone(), source_store.clone(), key));
                }
            }
        }

        // Apply the moves — the only step that mutates record data.
        let mut moved_from: BTreeMap<String, u64> = BTreeMap::new();
        for (source_name, source_store, key) in pending {
            if cancel.is_cancelled() {
                warn!(node = name, "node addition cancelled while applying moves");
                return Err(ClusterError::Cancelled);
            }
            if let Some(value) = source_store.take(&key).await? {
                debug!(key = %key, from = %source_name, to = name, "migrating record");
                store.put(key, value).await?;
                *moved_from.entry(source_name).or_insert(0) += 1;
            }
        }

        let records_moved: u64 = moved_from.values().sum();
        info!(node = name, records_moved, "node added");

        let _ = self.event_tx.send(ClusterEvent::NodeJoined {
            name: name.to_string(),
            records_moved,
        });

        Ok(JoinReport {
            node: name.to_string(),
            records_moved,
            moved_from,
        })
    }

    // ------------------------------------------------------------------
    // Membership: node removal
    // ------------------------------------------------------------------

    /// Remove a node, re-homing its records per the post-removal ring.
    /// Runs to completion.
    pub async fn remove_node(&self, name: &str) -> Result<LeaveReport, ClusterError> {
        self.remove_node_with(name, &CancelToken::never()).await
    }

    /// Remove a node with a cancellation token.
    ///
    /// The departing node's records are snapshotted before the ring
    /// changes, then redistributed against the post-removal topology.
    /// Removing the last node while it still holds records is refused
    /// with [`ClusterError::EmptyRing`] — the records would have no
    /// possible owner.
    pub async fn remove_node_with(
        &self,
        name: &str,
        cancel: &CancelToken,
    ) -> Result<LeaveReport, ClusterError> {
        let _guard = self.membership.lock().await;

        let store = self
            .nodes
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| ClusterError::NodeNotFound(name.to_string()))?;

        info!(node = name, "removing node");

        // Snapshot the soon-to-be-orphaned records before touching the ring.
        let snapshot = store.entries().await?;

        if !snapshot.is_empty() && self.nodes.read().await.len() == 1 {
            warn!(
                node = name,
                records = snapshot.len(),
                "refusing to remove the last node while it holds records"
            );
            return Err(ClusterError::EmptyRing);
        }

        // Ring mutation — after this the ring fully reflects the topology
        // without the departing node.
        self.ring.write().await.remove_node(name);
        let ring = self.ring.read().await.clone();

        // Re-home every snapshotted record under the new topology.
        let mut moved_to: BTreeMap<String, u64> = BTreeMap::new();
        {
            let nodes = self.nodes.read().await;
            for (key, value) in snapshot {
                if cancel.is_cancelled() {
                    warn!(node = name, "node removal cancelled during redistribution");
                    return Err(ClusterError::Cancelled);
                }
                let dest = ring.resolve_key(&key)?.to_string();
                let dest_store = nodes
                    .get(&dest)
                    .ok_or_else(|| ClusterError::NodeNotFound(dest.clone()))?;
                debug!(key = %key, from = name, to = %dest, "migrating record");
                dest_store.put(key, value).await?;
                *moved_to.entry(dest).or_insert(0) += 1;
            }
        }

        // Discard the departed node's store entry.
        self.nodes.write().await.remove(name);

        let records_moved: u64 = moved_to.values().sum();
        info!(node = name, records_moved, "node removed");

        let _ = self.event_tx.send(ClusterEvent::NodeLeft {
            name: name.to_string(),
            records_moved,
        });

        Ok(LeaveReport {
            node: name.to_string(),
            records_moved,
            moved_to,
        })
    }
}

impl std::fmt::Debug for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster")
            .field("vnodes_per_node", &self.config.vnodes_per_node)
            .finish_non_exhaustive()
    }
}
