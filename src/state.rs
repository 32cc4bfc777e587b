//! Persisted record of the last published run.
//!
//! A small JSON file read once before a run and written once after it.
//! Fields this crate does not know about are carried through unchanged.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StateError;

/// The last computed state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlSnapshot {
    /// Upload time of the last processed map, epoch seconds.
    #[serde(default)]
    pub latest_timestamp: i64,
    /// Faction A's share from the last successful analysis.
    #[serde(default, alias = "latest_land_controlled_by_ukraine_percent")]
    pub latest_percent_controlled: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// JSON file holding a [`ControlSnapshot`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot. A missing file reads as the default snapshot,
    /// so the first run on a fresh deployment processes any map.
    pub fn load(&self) -> Result<ControlSnapshot, StateError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no state file, starting fresh");
                return Ok(ControlSnapshot::default());
            }
            Err(err) => return Err(err.into()),
        };
        let snapshot: ControlSnapshot = serde_json::from_str(&text)?;
        debug!(?snapshot, "loaded state");
        Ok(snapshot)
    }

    /// Overwrite the file with `snapshot`, pretty-printed.
    pub fn save(&self, snapshot: &ControlSnapshot) -> Result<(), StateError> {
        let text = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, text)?;
        debug!(path = %self.path.display(), "saved state");
        Ok(())
    }
}
