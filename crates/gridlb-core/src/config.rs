//! gridlb.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::types::{Metric, Mode};

/// Default spread (percentage points) between the most and least loaded
/// node above which the cluster is considered unbalanced.
pub const DEFAULT_BALANCINESS: f64 = 10.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridlbConfig {
    #[serde(default)]
    pub balancing: BalancingConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancingConfig {
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_balanciness")]
    pub balanciness: f64,
    /// Report the full node record instead of only its name.
    #[serde(default = "default_return_node")]
    pub return_node: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Nodes forced into maintenance for every balancing cycle.
    #[serde(default)]
    pub maintenance_nodes: Vec<String>,
}

fn default_balanciness() -> f64 {
    DEFAULT_BALANCINESS
}

fn default_return_node() -> bool {
    true
}

impl Default for BalancingConfig {
    fn default() -> Self {
        Self {
            metric: Metric::default(),
            mode: Mode::default(),
            balanciness: DEFAULT_BALANCINESS,
            return_node: true,
        }
    }
}

impl GridlbConfig {
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: GridlbConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoreResult<()> {
        let b = self.balancing.balanciness;
        if !b.is_finite() || !(0.0..=100.0).contains(&b) {
            return Err(CoreError::ConfigValue(format!(
                "balancing.balanciness must be within 0..=100, got {b}"
            )));
        }
        if let Some(empty) = self.cluster.maintenance_nodes.iter().find(|n| n.trim().is_empty()) {
            return Err(CoreError::ConfigValue(format!(
                "cluster.maintenance_nodes contains an empty name: {empty:?}"
            )));
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Scaffold a gridlb.toml balancing on the given metric.
    pub fn scaffold(metric: Metric, mode: Mode) -> Self {
        GridlbConfig {
            balancing: BalancingConfig {
                metric,
                mode,
                ..BalancingConfig::default()
            },
            cluster: ClusterConfig::default(),
        }
    }
}
