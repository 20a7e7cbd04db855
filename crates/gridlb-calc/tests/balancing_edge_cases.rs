//! Balancing edge cases on whole cluster snapshots.
//!
//! Each scenario starts from a JSON snapshot shaped the way the metrics
//! collector writes it, then drives the aggregator and selector the way
//! the control loop does.

use gridlb_calc::*;
use gridlb_core::{Metric, Mode};
use gridlb_state::*;

fn snapshot(json: &str) -> ClusterState {
    ClusterState::from_json_str(json).unwrap()
}

#[test]
fn all_nodes_in_maintenance_selects_nothing() {
    let mut state = snapshot(
        r#"{
            "nodes": {
                "node1": {"name": "node1", "maintenance": true, "cpu_avg_percent": 10},
                "node2": {"name": "node2", "maintenance": true, "cpu_avg_percent": 20}
            },
            "meta": {"balancing": {}}
        }"#,
    );

    let result = select_and_record(&mut state, &SelectionRequest::new(Metric::Cpu, Mode::Avg));

    assert!(result.is_none(), "expected no candidate when every node is in maintenance");
    assert_eq!(state.meta.balancing.next_node(), Some(&NextNode::NoCandidate));
}

#[test]
fn empty_cluster_selects_nothing() {
    let mut state = snapshot(r#"{"nodes": {}, "meta": {"balancing": {}}}"#);

    let request = SelectionRequest::default().with_return_node(false);
    let result = select_and_record(&mut state, &request);

    assert!(result.is_none(), "expected no candidate for an empty cluster");
    assert_eq!(state.meta.balancing.next_node(), Some(&NextNode::NoCandidate));

    let json = state.to_json_string().unwrap();
    assert!(json.contains(r#""balance_next_node": null"#), "sentinel should persist as null: {json}");
}

#[test]
fn empty_cluster_aggregation_is_a_no_op() {
    let mut state = snapshot(r#"{"nodes": {}, "meta": {"balancing": {}}}"#);
    let before = state.clone();

    update_node_resources(&mut state);

    assert_eq!(state, before, "state should not change when there are no nodes");
}

#[test]
fn no_suitable_nodes_aggregation_is_a_no_op() {
    let mut state = snapshot(
        r#"{
            "nodes": {
                "node1": {"name": "node1", "cpu_avg_percent": 100, "maintenance": true,
                          "samples": {"cpu": [12.0, 14.0]}},
                "node2": {"name": "node2", "cpu_avg_percent": 100, "maintenance": true}
            },
            "meta": {"balancing": {}}
        }"#,
    );
    let before = state.clone();
    let before_json = state.to_json_string().unwrap();

    update_node_resources(&mut state);
    update_node_resources(&mut state);

    assert_eq!(state, before);
    assert_eq!(state.to_json_string().unwrap(), before_json);
}

#[test]
fn partial_eligibility_never_picks_maintenance_node() {
    let mut state = snapshot(
        r#"{
            "nodes": {
                "pve1": {"name": "pve1", "maintenance": true,
                         "samples": {"cpu": [1.0, 2.0, 3.0]}},
                "pve2": {"name": "pve2", "samples": {"cpu": [60.0, 70.0]}},
                "pve3": {"name": "pve3", "samples": {"cpu": [40.0, 50.0]}}
            }
        }"#,
    );

    update_node_resources(&mut state);
    let result = select_and_record(
        &mut state,
        &SelectionRequest::new(Metric::Cpu, Mode::Avg).with_return_node(false),
    );

    assert_eq!(result, Some(Candidate::Name("pve3".to_string())));
    // Maintenance node keeps its pending samples untouched.
    assert_eq!(state.node("pve1").unwrap().samples.cpu, vec![1.0, 2.0, 3.0]);
    assert_eq!(state.node("pve1").unwrap().resource(Metric::Cpu, Mode::Avg), None);
}

#[test]
fn peak_mode_can_change_the_winner() {
    let mut state = snapshot(
        r#"{
            "nodes": {
                "steady": {"name": "steady", "samples": {"memory": [45.0, 45.0, 45.0]}},
                "spiky":  {"name": "spiky",  "samples": {"memory": [10.0, 95.0, 10.0]}}
            }
        }"#,
    );
    update_node_resources(&mut state);

    let by_avg = get_most_free_node(
        &state,
        &SelectionRequest::new(Metric::Memory, Mode::Avg).with_return_node(false),
    );
    let by_peak = get_most_free_node(
        &state,
        &SelectionRequest::new(Metric::Memory, Mode::Peak).with_return_node(false),
    );

    assert_eq!(by_avg.as_ref().map(Candidate::name), Some("spiky"));
    assert_eq!(by_peak.as_ref().map(Candidate::name), Some("steady"));
}

#[test]
fn repeated_selection_is_deterministic() {
    let state = snapshot(
        r#"{
            "nodes": {
                "b": {"name": "b", "disk_current_percent": 30},
                "a": {"name": "a", "disk_current_percent": 30},
                "c": {"name": "c", "disk_current_percent": 30}
            }
        }"#,
    );
    let request = SelectionRequest::new(Metric::Disk, Mode::Current);

    let first = get_most_free_node(&state, &request);
    for _ in 0..10 {
        assert_eq!(get_most_free_node(&state, &request), first);
    }
    assert_eq!(first.as_ref().map(Candidate::name), Some("a"));
}

#[test]
fn cycle_report_serializes() {
    let mut state = snapshot(
        r#"{
            "nodes": {
                "node1": {"name": "node1", "samples": {"cpu": [20.0]}},
                "node2": {"name": "node2", "samples": {"cpu": [80.0]}}
            }
        }"#,
    );

    let report = run_cycle(&mut state, &CycleSettings::default());

    assert_eq!(report.next_node.candidate().map(Candidate::name), Some("node1"));
    assert!(report.balanciness.needs_balancing);

    let reloaded = snapshot(&state.to_json_string().unwrap());
    assert_eq!(reloaded, state);
}
