use std::path::Path;

use gridlb_calc::CycleSettings;
use gridlb_core::{GridlbConfig, Metric, Mode};

pub mod aggregate;
pub mod cycle;
pub mod init;
pub mod select;

/// Command-line values that take precedence over gridlb.toml.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub metric: Option<Metric>,
    pub mode: Option<Mode>,
}

/// Build cycle settings from an optional gridlb.toml plus CLI overrides.
pub fn load_settings(config: Option<&Path>, overrides: Overrides) -> anyhow::Result<CycleSettings> {
    let config = match config {
        Some(path) => GridlbConfig::from_file(path)?,
        None => GridlbConfig::default(),
    };
    let mut settings = CycleSettings::from(&config);
    if let Some(metric) = overrides.metric {
        settings.request.metric = metric;
    }
    if let Some(mode) = overrides.mode {
        settings.request.mode = mode;
    }
    Ok(settings)
}
