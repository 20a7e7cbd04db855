//! One balancing calculation pass.
//!
//! Mirrors what the control loop does each cycle: hold configured
//! maintenance nodes out of the pass, refresh aggregated resources,
//! measure balanciness, pick the most free node, and record both
//! outcomes in `meta.balancing`. Migration itself happens elsewhere.
//!
//! Configured maintenance is an overlay for the pass only. The
//! `maintenance` flag in the snapshot belongs to the collector and is
//! left as it was found.

use serde::Serialize;
use tracing::{info, warn};

use gridlb_core::{GridlbConfig, Metric, Mode, NodeId};
use gridlb_state::{BalancinessReport, ClusterState, NextNode};

use crate::aggregator::{AggregationSummary, update_node_resources};
use crate::balanciness::assess_balanciness;
use crate::selector::{SelectionRequest, get_most_free_node};

/// Inputs for a cycle, usually taken from `gridlb.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSettings {
    pub request: SelectionRequest,
    pub balanciness: f64,
    pub maintenance_nodes: Vec<NodeId>,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self::from(&GridlbConfig::default())
    }
}

impl From<&GridlbConfig> for CycleSettings {
    fn from(config: &GridlbConfig) -> Self {
        Self {
            request: SelectionRequest {
                metric: config.balancing.metric,
                mode: config.balancing.mode,
                return_node: config.balancing.return_node,
            },
            balanciness: config.balancing.balanciness,
            maintenance_nodes: config.cluster.maintenance_nodes.clone(),
        }
    }
}

impl CycleSettings {
    pub fn metric(&self) -> Metric {
        self.request.metric
    }

    pub fn mode(&self) -> Mode {
        self.request.mode
    }
}

/// Outcome of a single cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    /// Configured maintenance nodes that exist in the cluster and were
    /// held out of this pass.
    pub maintenance_applied: Vec<NodeId>,
    pub refreshed_nodes: usize,
    pub consumed_samples: usize,
    pub balanciness: BalancinessReport,
    pub next_node: NextNode,
}

/// Run one calculation pass over `state`, recording the results in
/// `state.meta.balancing`.
pub fn run_cycle(state: &mut ClusterState, settings: &CycleSettings) -> CycleReport {
    let mut maintenance_applied = Vec::new();
    // Nodes whose flag this pass raised, lowered again before returning.
    let mut overlaid = Vec::new();
    for name in &settings.maintenance_nodes {
        match state.node(name).map(|n| n.maintenance) {
            Some(already) => {
                if !already {
                    state.set_maintenance(name, true);
                    overlaid.push(name.as_str());
                }
                maintenance_applied.push(name.clone());
            }
            None => warn!(node = %name, "configured maintenance node not in cluster"),
        }
    }

    let AggregationSummary {
        refreshed_nodes,
        consumed_samples,
        ..
    } = update_node_resources(state);

    let balanciness = assess_balanciness(
        state,
        settings.metric(),
        settings.mode(),
        settings.balanciness,
    );
    state.meta.balancing.record_balanciness(balanciness.clone());

    let outcome = get_most_free_node(state, &settings.request);
    let next_node = state.meta.balancing.record_next_node(outcome).clone();

    for name in overlaid {
        state.set_maintenance(name, false);
    }

    match next_node.candidate() {
        Some(candidate) => info!(
            node = candidate.name(),
            metric = %settings.metric(),
            mode = %settings.mode(),
            spread = balanciness.spread,
            needs_balancing = balanciness.needs_balancing,
            "balancing cycle complete"
        ),
        None => warn!(
            nodes = state.nodes.len(),
            metric = %settings.metric(),
            mode = %settings.mode(),
            "balancing cycle found no eligible node"
        ),
    }

    CycleReport {
        maintenance_applied,
        refreshed_nodes,
        consumed_samples,
        balanciness,
        next_node,
    }
}
