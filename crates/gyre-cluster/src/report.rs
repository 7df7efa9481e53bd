//! Rebalancing reports returned by membership operations.

use std::collections::BTreeMap;
use std::fmt;

/// Result of a completed node addition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinReport {
    /// Name of the node that joined.
    pub node: String,
    /// Total records moved onto the new node.
    pub records_moved: u64,
    /// Records moved per source node, keyed by source name.
    pub moved_from: BTreeMap<String, u64>,
}

impl fmt::Display for JoinReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} records moved to new node '{}'",
            self.records_moved, self.node
        )?;
        for (source, count) in &self.moved_from {
            writeln!(f, "  <- from '{source}': {count} records")?;
        }
        Ok(())
    }
}

/// Result of a completed node removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveReport {
    /// Name of the node that was removed.
    pub node: String,
    /// Total records moved off the removed node.
    pub records_moved: u64,
    /// Records received per destination node, keyed by destination name.
    pub moved_to: BTreeMap<String, u64>,
}

impl fmt::Display for LeaveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} records moved from removed node '{}'",
            self.records_moved, self.node
        )?;
        for (dest, count) in &self.moved_to {
            writeln!(f, "  -> to '{dest}': {count} records")?;
        }
        Ok(())
    }
}
