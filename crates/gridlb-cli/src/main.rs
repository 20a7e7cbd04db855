use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gridlb_core::{Metric, Mode};

mod commands;

#[derive(Parser)]
#[command(
    name = "gridlb",
    about = "gridlb — resource balancing calculator for compute clusters",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick the most free node and record it as the next balancing target
    Select {
        /// Cluster snapshot (JSON)
        #[arg(short, long)]
        state: PathBuf,
        /// gridlb.toml with balancing defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Resource metric to rank by: cpu, memory, disk
        #[arg(long)]
        metric: Option<Metric>,
        /// Aggregation mode: avg, peak, current
        #[arg(long)]
        mode: Option<Mode>,
        /// Report only the node name instead of the full record
        #[arg(long)]
        name_only: bool,
        /// Write the updated snapshot back to --state
        #[arg(short, long)]
        write: bool,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Fold pending raw samples into aggregated resource fields
    Aggregate {
        #[arg(short, long)]
        state: PathBuf,
        #[arg(short, long)]
        write: bool,
    },
    /// List eligible nodes by free capacity, most free first
    Rank {
        #[arg(short, long)]
        state: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        metric: Option<Metric>,
        #[arg(long)]
        mode: Option<Mode>,
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Run a full calculation cycle: maintenance, aggregation, balanciness, selection
    Cycle {
        #[arg(short, long)]
        state: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        write: bool,
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Generate a gridlb.toml scaffold
    InitConfig {
        #[arg(short, long, default_value = "gridlb.toml")]
        path: PathBuf,
        #[arg(long, default_value = "cpu")]
        metric: Metric,
        #[arg(long, default_value = "avg")]
        mode: Mode,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gridlb=info".parse()?)
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Select {
            state,
            config,
            metric,
            mode,
            name_only,
            write,
            format,
        } => {
            let overrides = commands::Overrides { metric, mode };
            commands::select::select(&state, config.as_deref(), overrides, name_only, write, &format)
        }
        Commands::Aggregate { state, write } => commands::aggregate::aggregate(&state, write),
        Commands::Rank {
            state,
            config,
            metric,
            mode,
            format,
        } => {
            let overrides = commands::Overrides { metric, mode };
            commands::select::rank(&state, config.as_deref(), overrides, &format)
        }
        Commands::Cycle {
            state,
            config,
            write,
            format,
        } => commands::cycle::cycle(&state, config.as_deref(), write, &format),
        Commands::InitConfig {
            path,
            metric,
            mode,
            force,
        } => commands::init::init_config(&path, metric, mode, force),
    }
}
