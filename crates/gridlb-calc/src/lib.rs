//! gridlb-calc — the balancing calculation step.
//!
//! Pure, synchronous operations over a `ClusterState`. Nothing here
//! performs I/O or takes a lock; the control loop owns the state and
//! calls these in sequence for every balancing cycle.
//!
//! # Components
//!
//! - **`aggregator`** — folds raw samples into per-node metric cells
//! - **`selector`** — ranks eligible nodes and picks the most free one
//! - **`balanciness`** — measures load spread against a threshold
//! - **`cycle`** — one full calculation pass driven by `gridlb.toml`
//!
//! # Cycle
//!
//! ```text
//! run_cycle(state, settings)
//!   ├── apply maintenance_nodes
//!   ├── update_node_resources(state)        → AggregationSummary
//!   ├── assess_balanciness(state, ...)      → meta.balancing.balanciness
//!   └── get_most_free_node(state, request)  → meta.balancing.balance_next_node
//! ```

pub mod aggregator;
pub mod balanciness;
pub mod cycle;
pub mod selector;

pub use aggregator::{AggregationSummary, update_node_resources};
pub use balanciness::assess_balanciness;
pub use cycle::{CycleReport, CycleSettings, run_cycle};
pub use selector::{NodeRank, SelectionRequest, get_most_free_node, rank_nodes, select_and_record};
