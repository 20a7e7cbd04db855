use std::path::Path;

use gridlb_calc::run_cycle;
use gridlb_state::ClusterState;

use super::{Overrides, load_settings};

pub fn cycle(
    state_path: &Path,
    config: Option<&Path>,
    write: bool,
    format: &str,
) -> anyhow::Result<()> {
    let settings = load_settings(config, Overrides::default())?;
    let mut state = ClusterState::load_json(state_path)?;
    let report = run_cycle(&mut state, &settings);

    if write {
        state.save_json(state_path)?;
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            let b = &report.balanciness;
            println!(
                "Balanciness ({} {}): spread {:.1} points, threshold {:.1}",
                b.metric, b.mode, b.spread, b.threshold
            );
            if let (Some(high), Some(low)) = (&b.highest_node, &b.lowest_node) {
                println!("  Highest: {high} ({:.1}%)", b.highest_percent);
                println!("  Lowest:  {low} ({:.1}%)", b.lowest_percent);
            }
            println!(
                "  {}",
                if b.needs_balancing { "⚠️  Balancing needed" } else { "✓ Balanced" }
            );
            match report.next_node.candidate() {
                Some(candidate) => println!("✓ Next node: {}", candidate.name()),
                None => println!("✗ No eligible node"),
            }
        }
    }

    Ok(())
}
