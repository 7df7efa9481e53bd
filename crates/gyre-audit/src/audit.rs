//! Cross-check of physical placement against the resolver.

use std::fmt;

use gyre_cluster::{Cluster, ClusterError};
use tracing::{info, warn};

/// A record stored on a different node than the resolver names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// The affected key.
    pub key: String,
    /// The node the resolver says should hold it.
    pub expected: String,
    /// The node actually holding it.
    pub actual: String,
}

/// Outcome of a placement audit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Keys checked (size of the expected dataset).
    pub total: usize,
    /// Keys found exactly where the resolver says.
    pub matched: usize,
    /// Keys found on the wrong node.
    pub mismatched: Vec<Mismatch>,
    /// Keys found on no node at all — data loss.
    pub lost: Vec<String>,
}

impl AuditReport {
    /// True when every key matched: zero mismatches, zero losses.
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty() && self.lost.is_empty()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "audit: {} checked, {} correct, {} misplaced, {} lost",
            self.total,
            self.matched,
            self.mismatched.len(),
            self.lost.len()
        )
    }
}

/// Verify that every key of `expected_keys` is stored exactly on the node
/// the resolver currently names for it.
///
/// Scans every node's store once to build the actual placement map, then
/// compares per key. Each violation is logged as it is found; the report
/// aggregates them for the caller.
pub async fn audit_placement(
    cluster: &Cluster,
    expected_keys: &[String],
) -> Result<AuditReport, ClusterError> {
    let locations = cluster.locations().await?;

    let mut report = AuditReport {
        total: expected_keys.len(),
        ..AuditReport::default()
    };

    for key in expected_keys {
        match locations.get(key) {
            None => {
                warn!(key = %key, "record lost: found on no node");
                report.lost.push(key.clone());
            }
            Some(actual) => {
                let expected = cluster.resolve(key).await?;
                if &expected == actual {
                    report.matched += 1;
                } else {
                    warn!(
                        key = %key,
                        expected = %expected,
                        actual = %actual,
                        "record misplaced"
                    );
                    report.mismatched.push(Mismatch {
                        key: key.clone(),
                        expected,
                        actual: actual.clone(),
                    });
                }
            }
        }
    }

    info!(
        total = report.total,
        matched = report.matched,
        misplaced = report.mismatched.len(),
        lost = report.lost.len(),
        "placement audit complete"
    );

    Ok(report)
}
