//! gridlb-state — in-memory cluster state for gridlb.
//!
//! Holds the per-node resource tables and raw sample series the
//! calculator reads and refreshes, plus the balancing metadata that
//! records the outcome of the most recent selection.
//!
//! # Snapshot format
//!
//! A `ClusterState` serializes to JSON with one object per node. Metric
//! cells are flattened into the node object as `{metric}_{mode}_percent`
//! keys, so a snapshot reads like:
//!
//! ```text
//! {
//!   "nodes": {
//!     "node1": { "name": "node1", "maintenance": false, "cpu_avg_percent": 12.5 }
//!   },
//!   "meta": { "balancing": { "balance_next_node": "node1" } }
//! }
//! ```
//!
//! `balance_next_node` is absent until a selection is recorded and `null`
//! once a selection found no candidate.

pub mod error;
pub mod snapshot;
pub mod types;

pub use error::{StateError, StateResult};
pub use types::*;
