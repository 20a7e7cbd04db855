//! Balanciness — how far apart the busiest and idlest nodes are.
//!
//! ```text
//! spread          = highest_percent - lowest_percent   (eligible nodes only)
//! needs_balancing = ranked_nodes >= 2 && spread > threshold
//! ```

use tracing::debug;

use gridlb_core::{Metric, Mode};
use gridlb_state::{BalancinessReport, ClusterState};

use crate::selector::usage;

/// Measure the load spread of the eligible nodes for one metric/mode.
///
/// Nodes without a usable cell are left out, as in selection. Ties for
/// highest or lowest go to the smallest name.
pub fn assess_balanciness(
    state: &ClusterState,
    metric: Metric,
    mode: Mode,
    threshold: f64,
) -> BalancinessReport {
    let mut ranked = 0usize;
    let mut highest: Option<(&str, f64)> = None;
    let mut lowest: Option<(&str, f64)> = None;

    for (node, used) in usage(state, metric, mode) {
        ranked += 1;
        if highest.is_none_or(|(_, h)| used > h) {
            highest = Some((node.name.as_str(), used));
        }
        if lowest.is_none_or(|(_, l)| used < l) {
            lowest = Some((node.name.as_str(), used));
        }
    }

    let highest_percent = highest.map_or(0.0, |(_, p)| p);
    let lowest_percent = lowest.map_or(0.0, |(_, p)| p);
    let spread = highest_percent - lowest_percent;
    let needs_balancing = ranked >= 2 && spread > threshold;

    debug!(
        %metric,
        %mode,
        ranked,
        spread,
        threshold,
        needs_balancing,
        "balanciness assessed"
    );

    BalancinessReport {
        metric,
        mode,
        highest_node: highest.map(|(n, _)| n.to_string()),
        highest_percent,
        lowest_node: lowest.map(|(n, _)| n.to_string()),
        lowest_percent,
        spread,
        threshold,
        needs_balancing,
    }
}
