use std::path::Path;

use gridlb_calc::update_node_resources;
use gridlb_state::ClusterState;

pub fn aggregate(state_path: &Path, write: bool) -> anyhow::Result<()> {
    let mut state = ClusterState::load_json(state_path)?;
    let summary = update_node_resources(&mut state);

    if write {
        state.save_json(state_path)?;
    }

    if summary.refreshed_nodes == 0 {
        println!("✗ No eligible nodes, snapshot unchanged");
    } else {
        println!(
            "✓ Refreshed {} node(s) from {} sample(s)",
            summary.refreshed_nodes, summary.consumed_samples
        );
        if summary.rejected_samples > 0 {
            println!("  Dropped {} non-finite sample(s)", summary.rejected_samples);
        }
    }

    Ok(())
}
