//! Shared harness for Gyre integration tests.
//!
//! Provides [`SimCluster`] — a seeded in-process cluster plus the full
//! key list, with assertions for the placement invariant that every
//! integration scenario checks between membership changes.

use std::sync::Arc;

use bytes::Bytes;
use gyre_audit::audit_placement;
use gyre_cluster::Cluster;
use gyre_types::ClusterConfig;

/// A cluster seeded with `key_0..key_{n}` and the list of seeded keys.
pub struct SimCluster {
    /// The cluster under test.
    pub cluster: Arc<Cluster>,
    /// Every key seeded into it.
    pub keys: Vec<String>,
}

impl SimCluster {
    /// Build a cluster with the given nodes and seed `key_count` records.
    pub async fn new(node_names: &[&str], key_count: usize, vnodes: u32) -> Self {
        let cluster = Cluster::new(ClusterConfig::with_vnodes(vnodes));
        for name in node_names {
            cluster
                .add_node(name)
                .await
                .unwrap_or_else(|e| panic!("adding {name}: {e}"));
        }

        let mut keys = Vec::with_capacity(key_count);
        for i in 0..key_count {
            let key = format!("key_{i}");
            cluster
                .put_record(key.clone(), Bytes::from(format!("data_for_{key}")))
                .await
                .unwrap_or_else(|e| panic!("seeding {key}: {e}"));
            keys.push(key);
        }

        Self { cluster, keys }
    }

    /// The node the resolver currently names for `key`.
    pub async fn owner_of(&self, key: &str) -> String {
        self.cluster.resolve(key).await.expect("resolvable key")
    }

    /// The node actually storing `key`, if any.
    pub async fn located_on(&self, key: &str) -> Option<String> {
        self.cluster.locations().await.expect("scan").get(key).cloned()
    }

    /// Total records across all nodes.
    pub async fn total_records(&self) -> usize {
        self.cluster.total_records().await.expect("count")
    }

    /// Assert a clean placement audit over the full seeded dataset.
    pub async fn assert_clean(&self, context: &str) {
        let report = audit_placement(&self.cluster, &self.keys)
            .await
            .expect("audit");
        assert!(report.is_clean(), "audit not clean after {context}: {report}");
    }
}
