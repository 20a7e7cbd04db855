use std::fmt::Write;
use std::path::Path;

use gridlb_calc::{NodeRank, rank_nodes, select_and_record};
use gridlb_state::{Candidate, ClusterState};

use super::{Overrides, load_settings};

pub fn select(
    state_path: &Path,
    config: Option<&Path>,
    overrides: Overrides,
    name_only: bool,
    write: bool,
    format: &str,
) -> anyhow::Result<()> {
    let settings = load_settings(config, overrides)?;
    let mut request = settings.request;
    if name_only {
        request.return_node = false;
    }

    let mut state = ClusterState::load_json(state_path)?;
    let outcome = select_and_record(&mut state, &request);

    if write {
        state.save_json(state_path)?;
    }

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        _ => match &outcome {
            Some(Candidate::Record(node)) => {
                let used = node.resource(request.metric, request.mode).unwrap_or_default();
                println!(
                    "✓ Next node: {} ({} {}: {:.1}% used, {:.1}% free)",
                    node.name,
                    request.metric,
                    request.mode,
                    used,
                    100.0 - used
                );
            }
            Some(Candidate::Name(name)) => println!("{name}"),
            None => println!("✗ No eligible node"),
        },
    }

    Ok(())
}

pub fn rank(
    state_path: &Path,
    config: Option<&Path>,
    overrides: Overrides,
    format: &str,
) -> anyhow::Result<()> {
    let settings = load_settings(config, overrides)?;
    let state = ClusterState::load_json(state_path)?;
    let ranks = rank_nodes(&state, settings.metric(), settings.mode());

    print!("{}", render_ranks(&ranks, format)?);
    Ok(())
}

fn render_ranks(ranks: &[NodeRank], format: &str) -> anyhow::Result<String> {
    let mut out = String::new();
    match format {
        "json" => {
            out.push_str(&serde_json::to_string_pretty(ranks)?);
            out.push('\n');
        }
        _ => {
            writeln!(out, "{:<24} {:>8} {:>8}", "NODE", "USED%", "FREE%")?;
            for r in ranks {
                writeln!(out, "{:<24} {:>8.1} {:>8.1}", r.name, r.used_percent, r.free_percent)?;
            }
            if ranks.is_empty() {
                writeln!(out, "(no eligible nodes)")?;
            }
        }
    }
    Ok(out)
}
