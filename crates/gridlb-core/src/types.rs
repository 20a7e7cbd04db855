//! Shared types used across gridlb crates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Unique identifier for a node in the cluster.
pub type NodeId = String;

/// A resource dimension that nodes are balanced on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Cpu,
    #[serde(alias = "mem")]
    Memory,
    Disk,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Cpu, Metric::Memory, Metric::Disk];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Memory => "memory",
            Metric::Disk => "disk",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Metric::Cpu),
            "memory" | "mem" => Ok(Metric::Memory),
            "disk" => Ok(Metric::Disk),
            other => Err(CoreError::UnknownMetric(other.to_string())),
        }
    }
}

/// How raw samples of a metric are folded into one percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Arithmetic mean of the samples.
    #[default]
    #[serde(alias = "average")]
    Avg,
    /// Maximum sample.
    #[serde(alias = "max")]
    Peak,
    /// Most recent sample.
    #[serde(alias = "last")]
    Current,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Avg, Mode::Peak, Mode::Current];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Avg => "avg",
            Mode::Peak => "peak",
            Mode::Current => "current",
        }
    }

    /// Fold a sample series. Returns `None` for an empty series.
    pub fn fold(&self, samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        let value = match self {
            Mode::Avg => samples.iter().sum::<f64>() / samples.len() as f64,
            Mode::Peak => samples.iter().copied().fold(f64::MIN, f64::max),
            Mode::Current => samples[samples.len() - 1],
        };
        Some(value)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" | "average" => Ok(Mode::Avg),
            "peak" | "max" => Ok(Mode::Peak),
            "current" | "last" => Ok(Mode::Current),
            other => Err(CoreError::UnknownMode(other.to_string())),
        }
    }
}

/// Field name used for a metric/mode cell in snapshots, e.g. `cpu_avg_percent`.
pub fn percent_field_name(metric: Metric, mode: Mode) -> String {
    format!("{}_{}_percent", metric.as_str(), mode.as_str())
}
