//! Domain types for the gridlb cluster state.
//!
//! These types represent one balancing snapshot of the cluster: the
//! nodes with their aggregated resource cells and raw sample series, and
//! the balancing metadata written by the control loop.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use gridlb_core::{Metric, Mode, NodeId};

use crate::error::{StateError, StateResult};

// ── Resources ─────────────────────────────────────────────────────

/// Aggregated consumption per metric and mode, as percentages in `0..=100`.
///
/// Cells are `None` until populated by the caller or an aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeResources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_avg_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_peak_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_current_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_avg_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_peak_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_current_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_avg_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_peak_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_current_percent: Option<f64>,
}

impl NodeResources {
    fn cell(&self, metric: Metric, mode: Mode) -> &Option<f64> {
        match (metric, mode) {
            (Metric::Cpu, Mode::Avg) => &self.cpu_avg_percent,
            (Metric::Cpu, Mode::Peak) => &self.cpu_peak_percent,
            (Metric::Cpu, Mode::Current) => &self.cpu_current_percent,
            (Metric::Memory, Mode::Avg) => &self.memory_avg_percent,
            (Metric::Memory, Mode::Peak) => &self.memory_peak_percent,
            (Metric::Memory, Mode::Current) => &self.memory_current_percent,
            (Metric::Disk, Mode::Avg) => &self.disk_avg_percent,
            (Metric::Disk, Mode::Peak) => &self.disk_peak_percent,
            (Metric::Disk, Mode::Current) => &self.disk_current_percent,
        }
    }

    fn cell_mut(&mut self, metric: Metric, mode: Mode) -> &mut Option<f64> {
        match (metric, mode) {
            (Metric::Cpu, Mode::Avg) => &mut self.cpu_avg_percent,
            (Metric::Cpu, Mode::Peak) => &mut self.cpu_peak_percent,
            (Metric::Cpu, Mode::Current) => &mut self.cpu_current_percent,
            (Metric::Memory, Mode::Avg) => &mut self.memory_avg_percent,
            (Metric::Memory, Mode::Peak) => &mut self.memory_peak_percent,
            (Metric::Memory, Mode::Current) => &mut self.memory_current_percent,
            (Metric::Disk, Mode::Avg) => &mut self.disk_avg_percent,
            (Metric::Disk, Mode::Peak) => &mut self.disk_peak_percent,
            (Metric::Disk, Mode::Current) => &mut self.disk_current_percent,
        }
    }

    /// Consumed percentage for a metric/mode, if defined.
    pub fn get(&self, metric: Metric, mode: Mode) -> Option<f64> {
        *self.cell(metric, mode)
    }

    pub fn set(&mut self, metric: Metric, mode: Mode, percent: f64) {
        *self.cell_mut(metric, mode) = Some(percent);
    }

    pub fn is_defined(&self, metric: Metric, mode: Mode) -> bool {
        self.cell(metric, mode).is_some()
    }
}

/// Raw utilization samples per metric, collected since the last
/// aggregation pass. Oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSamples {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cpu: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memory: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disk: Vec<f64>,
}

impl NodeSamples {
    pub fn series(&self, metric: Metric) -> &[f64] {
        match metric {
            Metric::Cpu => &self.cpu,
            Metric::Memory => &self.memory,
            Metric::Disk => &self.disk,
        }
    }

    pub fn series_mut(&mut self, metric: Metric) -> &mut Vec<f64> {
        match metric {
            Metric::Cpu => &mut self.cpu,
            Metric::Memory => &mut self.memory,
            Metric::Disk => &mut self.disk,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cpu.is_empty() && self.memory.is_empty() && self.disk.is_empty()
    }
}

// ── Node ──────────────────────────────────────────────────────────

/// Observed state of one cluster node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: NodeId,
    /// Nodes in maintenance are never balancing targets.
    #[serde(default)]
    pub maintenance: bool,
    #[serde(flatten)]
    pub resources: NodeResources,
    #[serde(default, skip_serializing_if = "NodeSamples::is_empty")]
    pub samples: NodeSamples,
}

impl NodeRecord {
    pub fn new(name: impl Into<NodeId>) -> Self {
        Self {
            name: name.into(),
            maintenance: false,
            resources: NodeResources::default(),
            samples: NodeSamples::default(),
        }
    }

    pub fn with_maintenance(mut self, maintenance: bool) -> Self {
        self.maintenance = maintenance;
        self
    }

    pub fn with_resource(mut self, metric: Metric, mode: Mode, percent: f64) -> Self {
        self.resources.set(metric, mode, percent);
        self
    }

    pub fn with_samples(mut self, metric: Metric, samples: &[f64]) -> Self {
        self.samples.series_mut(metric).extend_from_slice(samples);
        self
    }

    /// Whether this node may be chosen as a balancing target.
    pub fn is_eligible(&self) -> bool {
        !self.maintenance
    }

    pub fn resource(&self, metric: Metric, mode: Mode) -> Option<f64> {
        self.resources.get(metric, mode)
    }

    /// Append a raw utilization sample (percent consumed).
    pub fn record_sample(&mut self, metric: Metric, percent: f64) {
        self.samples.series_mut(metric).push(percent);
    }
}

// ── Selection outcome ─────────────────────────────────────────────

/// A chosen balancing target, either by name or as the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Candidate {
    Name(NodeId),
    Record(Box<NodeRecord>),
}

impl Candidate {
    pub fn name(&self) -> &str {
        match self {
            Candidate::Name(name) => name,
            Candidate::Record(node) => &node.name,
        }
    }
}

/// Recorded outcome of the most recent selection.
///
/// `NoCandidate` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NextNode {
    Selected(Candidate),
    NoCandidate,
}

impl NextNode {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            NextNode::Selected(c) => Some(c),
            NextNode::NoCandidate => None,
        }
    }

    pub fn is_no_candidate(&self) -> bool {
        matches!(self, NextNode::NoCandidate)
    }
}

impl From<Option<Candidate>> for NextNode {
    fn from(outcome: Option<Candidate>) -> Self {
        match outcome {
            Some(c) => NextNode::Selected(c),
            None => NextNode::NoCandidate,
        }
    }
}

/// Spread between the most and least loaded eligible nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancinessReport {
    pub metric: Metric,
    pub mode: Mode,
    pub highest_node: Option<NodeId>,
    pub highest_percent: f64,
    pub lowest_node: Option<NodeId>,
    pub lowest_percent: f64,
    /// `highest_percent - lowest_percent`, in percentage points.
    pub spread: f64,
    pub threshold: f64,
    pub needs_balancing: bool,
}

// ── Cluster ───────────────────────────────────────────────────────

/// Balancing outcomes consumed by the migration step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BalancingMeta {
    #[serde(
        default,
        deserialize_with = "present_next_node",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance_next_node: Option<NextNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balanciness: Option<BalancinessReport>,
}

/// A present `balance_next_node` key is always a recorded outcome, even
/// when its value is `null`.
fn present_next_node<'de, D>(deserializer: D) -> Result<Option<NextNode>, D::Error>
where
    D: Deserializer<'de>,
{
    NextNode::deserialize(deserializer).map(Some)
}

impl BalancingMeta {
    /// Record a selection outcome, replacing any earlier one.
    pub fn record_next_node(&mut self, outcome: Option<Candidate>) -> &NextNode {
        self.balance_next_node.insert(NextNode::from(outcome))
    }

    pub fn next_node(&self) -> Option<&NextNode> {
        self.balance_next_node.as_ref()
    }

    pub fn record_balanciness(&mut self, report: BalancinessReport) {
        self.balanciness = Some(report);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterMeta {
    #[serde(default)]
    pub balancing: BalancingMeta,
}

/// Root object passed between balancing operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterState {
    /// Node name → record. Ordered, so every pass visits nodes by name.
    #[serde(default)]
    pub nodes: BTreeMap<NodeId, NodeRecord>,
    #[serde(default)]
    pub meta: ClusterMeta,
}

impl ClusterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node, keyed by its name.
    pub fn insert_node(&mut self, node: NodeRecord) -> Option<NodeRecord> {
        self.nodes.insert(node.name.clone(), node)
    }

    pub fn with_node(mut self, node: NodeRecord) -> Self {
        self.insert_node(node);
        self
    }

    pub fn node(&self, name: &str) -> Option<&NodeRecord> {
        self.nodes.get(name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut NodeRecord> {
        self.nodes.get_mut(name)
    }

    /// Nodes not under maintenance, in name order.
    pub fn eligible_nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.values().filter(|n| n.is_eligible())
    }

    pub fn has_eligible_nodes(&self) -> bool {
        self.eligible_nodes().next().is_some()
    }

    /// Set the maintenance flag on a node. Returns `false` for unknown names.
    pub fn set_maintenance(&mut self, name: &str, maintenance: bool) -> bool {
        match self.nodes.get_mut(name) {
            Some(node) => {
                node.maintenance = maintenance;
                true
            }
            None => false,
        }
    }

    /// Check that every map key matches its record's name.
    pub fn validate(&self) -> StateResult<()> {
        for (key, node) in &self.nodes {
            if *key != node.name {
                return Err(StateError::Inconsistent(format!(
                    "node keyed as {key:?} is named {:?}",
                    node.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_table_covers_every_cell() {
        let mut resources = NodeResources::default();
        for (i, metric) in Metric::ALL.into_iter().enumerate() {
            for (j, mode) in Mode::ALL.into_iter().enumerate() {
                assert!(!resources.is_defined(metric, mode));
                resources.set(metric, mode, (i * 3 + j) as f64);
            }
        }
        for (i, metric) in Metric::ALL.into_iter().enumerate() {
            for (j, mode) in Mode::ALL.into_iter().enumerate() {
                assert_eq!(resources.get(metric, mode), Some((i * 3 + j) as f64));
            }
        }
    }

    #[test]
    fn parses_flat_percent_fields() {
        let json = r#"{
            "nodes": {
                "node1": {"name": "node1", "maintenance": true, "cpu_avg_percent": 10},
                "node2": {"name": "node2", "memory_peak_percent": 55.5}
            },
            "meta": {"balancing": {}}
        }"#;
        let state: ClusterState = serde_json::from_str(json).unwrap();

        let node1 = state.node("node1").unwrap();
        assert!(node1.maintenance);
        assert_eq!(node1.resource(Metric::Cpu, Mode::Avg), Some(10.0));

        let node2 = state.node("node2").unwrap();
        assert!(!node2.maintenance);
        assert_eq!(node2.resource(Metric::Memory, Mode::Peak), Some(55.5));
        assert_eq!(node2.resource(Metric::Cpu, Mode::Avg), None);

        assert!(state.meta.balancing.next_node().is_none());
    }

    #[test]
    fn next_node_null_is_recorded_no_candidate() {
        let json = r#"{"balance_next_node": null}"#;
        let meta: BalancingMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.balance_next_node, Some(NextNode::NoCandidate));

        let absent: BalancingMeta = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.balance_next_node, None);
    }

    #[test]
    fn next_node_serializes_as_null_or_name() {
        let mut meta = BalancingMeta::default();
        assert_eq!(serde_json::to_string(&meta).unwrap(), "{}");

        meta.record_next_node(None);
        assert_eq!(
            serde_json::to_string(&meta).unwrap(),
            r#"{"balance_next_node":null}"#
        );

        meta.record_next_node(Some(Candidate::Name("node2".to_string())));
        assert_eq!(
            serde_json::to_string(&meta).unwrap(),
            r#"{"balance_next_node":"node2"}"#
        );
    }

    #[test]
    fn record_candidate_round_trips_through_json() {
        let node = NodeRecord::new("node1").with_resource(Metric::Cpu, Mode::Avg, 12.0);
        let mut meta = BalancingMeta::default();
        meta.record_next_node(Some(Candidate::Record(Box::new(node.clone()))));

        let json = serde_json::to_string(&meta).unwrap();
        let back: BalancingMeta = serde_json::from_str(&json).unwrap();
        let candidate = back.next_node().and_then(NextNode::candidate).unwrap();
        assert_eq!(candidate, &Candidate::Record(Box::new(node)));
        assert_eq!(candidate.name(), "node1");
    }

    #[test]
    fn eligible_nodes_skip_maintenance() {
        let state = ClusterState::new()
            .with_node(NodeRecord::new("a").with_maintenance(true))
            .with_node(NodeRecord::new("b"))
            .with_node(NodeRecord::new("c"));

        let names: Vec<&str> = state.eligible_nodes().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert!(state.has_eligible_nodes());
    }

    #[test]
    fn set_maintenance_unknown_node() {
        let mut state = ClusterState::new().with_node(NodeRecord::new("a"));
        assert!(state.set_maintenance("a", true));
        assert!(!state.set_maintenance("zz", true));
        assert!(!state.has_eligible_nodes());
    }

    #[test]
    fn validate_detects_mismatched_key() {
        let mut state = ClusterState::new();
        state.nodes.insert("node1".to_string(), NodeRecord::new("node2"));
        assert!(matches!(state.validate(), Err(StateError::Inconsistent(_))));

        let ok = ClusterState::new().with_node(NodeRecord::new("node1"));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn samples_are_omitted_when_empty() {
        let node = NodeRecord::new("n1");
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"{"name":"n1","maintenance":false}"#);

        let mut sampled = node.clone();
        sampled.record_sample(Metric::Disk, 42.0);
        let json = serde_json::to_string(&sampled).unwrap();
        assert!(json.contains(r#""samples":{"disk":[42.0]}"#));
    }
}
