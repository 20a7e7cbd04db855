//! Resource aggregator — folds raw samples into metric cells.
//!
//! For every eligible node and every metric, the pending sample series is
//! reduced with each `Mode` (mean, maximum, last) and the results are
//! written into the node's resource table. The consumed samples are then
//! cleared, so the next pass only sees what arrived since.
//!
//! Maintenance nodes are skipped entirely. When the cluster has no
//! eligible node at all the pass is a no-op and the state is returned
//! exactly as it came in.

use tracing::debug;

use gridlb_core::{Metric, Mode};
use gridlb_state::{ClusterState, NodeRecord};

/// Value given to a cell that has neither samples nor a previous value.
pub const BASELINE_PERCENT: f64 = 0.0;

/// What an aggregation pass touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    /// Eligible nodes whose cells were refreshed.
    pub refreshed_nodes: usize,
    /// Raw samples consumed across all refreshed nodes.
    pub consumed_samples: usize,
    /// Non-finite samples dropped.
    pub rejected_samples: usize,
}

/// Recompute aggregated resource cells for every eligible node.
pub fn update_node_resources(state: &mut ClusterState) -> AggregationSummary {
    if !state.has_eligible_nodes() {
        debug!(
            nodes = state.nodes.len(),
            "no eligible nodes, resource aggregation skipped"
        );
        return AggregationSummary::default();
    }

    let mut summary = AggregationSummary::default();
    for node in state.nodes.values_mut().filter(|n| n.is_eligible()) {
        let (consumed, rejected) = refresh_node(node);
        summary.refreshed_nodes += 1;
        summary.consumed_samples += consumed;
        summary.rejected_samples += rejected;
    }

    debug!(
        refreshed = summary.refreshed_nodes,
        samples = summary.consumed_samples,
        rejected = summary.rejected_samples,
        "node resources aggregated"
    );
    summary
}

/// Returns (consumed, rejected) sample counts.
fn refresh_node(node: &mut NodeRecord) -> (usize, usize) {
    let mut consumed = 0;
    let mut rejected = 0;

    for metric in Metric::ALL {
        let series = std::mem::take(node.samples.series_mut(metric));
        let valid: Vec<f64> = series
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(0.0, 100.0))
            .collect();

        consumed += series.len();
        if valid.len() < series.len() {
            rejected += series.len() - valid.len();
            debug!(
                node = %node.name,
                %metric,
                dropped = series.len() - valid.len(),
                "dropped non-finite samples"
            );
        }

        for mode in Mode::ALL {
            match mode.fold(&valid) {
                Some(percent) => node.resources.set(metric, mode, percent),
                None if !node.resources.is_defined(metric, mode) => {
                    node.resources.set(metric, mode, BASELINE_PERCENT)
                }
                None => {}
            }
        }
    }

    (consumed, rejected)
}
