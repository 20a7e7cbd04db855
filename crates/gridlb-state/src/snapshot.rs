//! JSON snapshots of a `ClusterState`.
//!
//! The control loop (or the `gridlb` CLI) loads a snapshot produced by
//! the metrics collector, runs the calculator on it and optionally writes
//! it back for the migration step.

use std::path::Path;

use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::types::ClusterState;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

impl ClusterState {
    pub fn from_json_str(content: &str) -> StateResult<Self> {
        let state: ClusterState = serde_json::from_str(content).map_err(map_err!(Deserialize))?;
        state.validate()?;
        Ok(state)
    }

    pub fn to_json_string(&self) -> StateResult<String> {
        serde_json::to_string_pretty(self).map_err(map_err!(Serialize))
    }

    /// Load and validate a snapshot from disk.
    pub fn load_json(path: &Path) -> StateResult<Self> {
        let content = std::fs::read_to_string(path).map_err(map_err!(Read))?;
        let state = Self::from_json_str(&content)?;
        debug!(?path, nodes = state.nodes.len(), "cluster snapshot loaded");
        Ok(state)
    }

    /// Write the snapshot next to `path` and rename it into place.
    pub fn save_json(&self, path: &Path) -> StateResult<()> {
        let content = self.to_json_string()?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(map_err!(Write))?;
        std::fs::rename(&tmp, path).map_err(map_err!(Write))?;
        debug!(?path, nodes = self.nodes.len(), "cluster snapshot saved");
        Ok(())
    }
}
