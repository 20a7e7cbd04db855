//! Candidate selection — find the node with the most free capacity.
//!
//! Free capacity is `100 - consumed` for the requested metric and mode.
//! Only eligible nodes (not in maintenance) with a usable cell are
//! ranked; a node whose cell is missing, non-finite or outside `0..=100`
//! sits out the pass. Ties go to the lexicographically smallest name.
//!
//! Selection is a query. Storing the outcome in the balancing metadata
//! is a separate, explicit step (`BalancingMeta::record_next_node`), or
//! both at once through [`select_and_record`].

use serde::Serialize;
use tracing::debug;

use gridlb_core::{Metric, Mode, NodeId};
use gridlb_state::{Candidate, ClusterState, NodeRecord, NodeSamples};

/// Which cell to rank by and how to report the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRequest {
    pub metric: Metric,
    pub mode: Mode,
    /// Return the full node record instead of only its name.
    pub return_node: bool,
}

impl Default for SelectionRequest {
    fn default() -> Self {
        Self {
            metric: Metric::Cpu,
            mode: Mode::Avg,
            return_node: true,
        }
    }
}

impl SelectionRequest {
    pub fn new(metric: Metric, mode: Mode) -> Self {
        Self {
            metric,
            mode,
            ..Self::default()
        }
    }

    pub fn with_return_node(mut self, return_node: bool) -> Self {
        self.return_node = return_node;
        self
    }
}

/// One entry of a free-capacity ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRank {
    pub name: NodeId,
    pub used_percent: f64,
    pub free_percent: f64,
}

/// Eligible nodes with a usable cell, in name order, paired with the
/// consumed percentage.
pub(crate) fn usage<'a>(
    state: &'a ClusterState,
    metric: Metric,
    mode: Mode,
) -> impl Iterator<Item = (&'a NodeRecord, f64)> + 'a {
    state.eligible_nodes().filter_map(move |node| {
        match node.resource(metric, mode) {
            Some(used) if used.is_finite() && (0.0..=100.0).contains(&used) => Some((node, used)),
            other => {
                debug!(
                    node = %node.name,
                    %metric,
                    %mode,
                    value = ?other,
                    "node excluded from ranking, resource cell unusable"
                );
                None
            }
        }
    })
}

/// Rank eligible nodes by free capacity, most free first.
pub fn rank_nodes(state: &ClusterState, metric: Metric, mode: Mode) -> Vec<NodeRank> {
    let mut ranks: Vec<NodeRank> = usage(state, metric, mode)
        .map(|(node, used)| NodeRank {
            name: node.name.clone(),
            used_percent: used,
            free_percent: 100.0 - used,
        })
        .collect();

    // Stable sort keeps name order among equal free capacity.
    ranks.sort_by(|a, b| b.free_percent.total_cmp(&a.free_percent));
    ranks
}

/// Pick the eligible node with the most free capacity.
///
/// Returns `None` when no node qualifies: an empty cluster, every node
/// in maintenance, or no eligible node with the requested cell.
pub fn get_most_free_node(state: &ClusterState, request: &SelectionRequest) -> Option<Candidate> {
    let mut best: Option<(&NodeRecord, f64)> = None;
    for (node, used) in usage(state, request.metric, request.mode) {
        let free = 100.0 - used;
        // Strictly greater, so the first name in order wins a tie.
        if best.is_none_or(|(_, best_free)| free > best_free) {
            best = Some((node, free));
        }
    }

    match best {
        Some((node, free)) => {
            debug!(
                node = %node.name,
                metric = %request.metric,
                mode = %request.mode,
                free_percent = free,
                "most free node selected"
            );
            Some(if request.return_node {
                // Pending samples stay with the node, not the recorded target.
                let mut record = node.clone();
                record.samples = NodeSamples::default();
                Candidate::Record(Box::new(record))
            } else {
                Candidate::Name(node.name.clone())
            })
        }
        None => {
            debug!(
                nodes = state.nodes.len(),
                metric = %request.metric,
                mode = %request.mode,
                "no eligible node available"
            );
            None
        }
    }
}

/// Select the most free node and record the outcome as
/// `meta.balancing.balance_next_node`. Returns the recorded value.
pub fn select_and_record(state: &mut ClusterState, request: &SelectionRequest) -> Option<Candidate> {
    let outcome = get_most_free_node(state, request);
    state.meta.balancing.record_next_node(outcome.clone());
    outcome
}
