//! Per-node load distribution report.

use std::collections::BTreeMap;
use std::fmt;

use gyre_cluster::{Cluster, ClusterError};

/// Per-node record counts with summary statistics.
///
/// Vnode multiplexing should keep these counts close together; a large
/// spread for a healthy cluster means the vnode count is too low for the
/// node count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records per node, keyed by node name.
    pub counts: BTreeMap<String, usize>,
}

impl LoadReport {
    /// Total records across all nodes.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Smallest per-node count (0 for an empty cluster).
    pub fn min(&self) -> usize {
        self.counts.values().copied().min().unwrap_or(0)
    }

    /// Largest per-node count (0 for an empty cluster).
    pub fn max(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    /// Mean records per node (0.0 for an empty cluster).
    pub fn mean(&self) -> f64 {
        if self.counts.is_empty() {
            0.0
        } else {
            self.total() as f64 / self.counts.len() as f64
        }
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, count) in &self.counts {
            writeln!(f, "node {name:<12} {count} records")?;
        }
        write!(
            f,
            "total {} across {} nodes (min {}, max {}, mean {:.1})",
            self.total(),
            self.counts.len(),
            self.min(),
            self.max(),
            self.mean()
        )
    }
}

/// Snapshot the per-node record distribution.
pub async fn distribution(cluster: &Cluster) -> Result<LoadReport, ClusterError> {
    Ok(LoadReport {
        counts: cluster.record_counts().await?,
    })
}
