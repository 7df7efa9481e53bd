//! Cluster membership and record migration.
//!
//! [`Cluster`] owns the shared state of the system — the placement ring
//! plus every node's local record store — and drives the two rebalancing
//! protocols: node addition and node removal. Both move only the records
//! whose resolved owner actually changed, and both restore the global
//! placement invariant (every record lives on the node the ring currently
//! names) before returning.
//!
//! Membership operations are serialized by an internal writer lock held
//! for the whole operation; ownership resolution stays available to
//! concurrent readers except during the brief ring-mutation sub-step.

mod cancel;
mod cluster;
mod error;
mod report;


pub use cancel::{CancelHandle, CancelToken};
pub use cluster::Cluster;
pub use error::ClusterError;
pub use report::{JoinReport, LeaveReport};
