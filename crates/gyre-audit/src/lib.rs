//! Placement audit and load diagnostics.
//!
//! The auditor is the end-to-end correctness oracle for the cluster: it
//! rebuilds the actual key → node placement by scanning every store and
//! compares it against the resolver's answer for each key in the original
//! dataset. A non-clean report signals a violated invariant — a bug in the
//! migration logic or an interrupted migration — not a recoverable runtime
//! condition. It is a read-only utility, never part of the request path.

mod audit;
mod distribution;


pub use audit::{audit_placement, AuditReport, Mismatch};
pub use distribution::{distribution, LoadReport};
