use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// All analysis parameters in one struct.
///
/// Serializable so a deployment can override the layer labels or colors
/// when the source map changes its scheme. Missing fields fall back to
/// [`AnalysisConfig::default`], which matches the current source map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // -- Layer lookup --
    /// Group holding the faction-colored land regions.
    pub basemap: GroupSelector,
    /// Group holding water outlines; only filled paths count as water.
    pub rivers: GroupSelector,

    // -- Factions --
    /// Exactly two factions. Entry 0 is faction A, the tracked side whose
    /// share is reported; entry 1 is faction B.
    pub factions: [FactionSpec; 2],

    // -- Geometry --
    /// Maximum distance (document units) between a curve and its
    /// flattened polyline.
    pub flatten_tolerance: f64,
    /// If true, paths with unparseable data are logged and skipped instead
    /// of aborting the run.
    pub skip_malformed_paths: bool,
}

/// Identifies a group in the document tree by its structural label,
/// optionally narrowed by element id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSelector {
    /// Value of the group's `inkscape:label` attribute.
    pub label: String,
    /// Value of the group's `id` attribute. `None` matches any id.
    #[serde(default)]
    pub id: Option<String>,
}

impl GroupSelector {
    pub fn new(label: impl Into<String>, id: Option<&str>) -> Self {
        Self {
            label: label.into(),
            id: id.map(str::to_string),
        }
    }
}

/// One side of the conflict as it appears on the basemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionSpec {
    /// Human-readable name used in the report line.
    pub label: String,
    /// Fill color token (e.g. `#e3d975`), compared case-insensitively.
    pub fill: String,
    /// Paint order. A higher value is drawn over a lower one and wins
    /// wherever both layers cover the same land.
    pub precedence: u8,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            basemap: GroupSelector::new("Basemap", Some("layer1")),
            rivers: GroupSelector::new("Rivers", Some("layer2")),
            factions: [
                FactionSpec {
                    label: "Ukraine".to_string(),
                    fill: "#e3d975".to_string(),
                    precedence: 0,
                },
                FactionSpec {
                    label: "Russia".to_string(),
                    fill: "#ebc0b3".to_string(),
                    precedence: 1,
                },
            ],
            flatten_tolerance: 0.01,
            skip_malformed_paths: false,
        }
    }
}

impl AnalysisConfig {
    /// Faction A, the side whose share of land is tracked.
    pub fn tracked(&self) -> &FactionSpec {
        &self.factions[0]
    }

    /// Faction B.
    pub fn rival(&self) -> &FactionSpec {
        &self.factions[1]
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !self.flatten_tolerance.is_finite() || self.flatten_tolerance <= 0.0 {
            return Err(AnalysisError::InvalidConfig(format!(
                "flatten_tolerance must be positive, got {}",
                self.flatten_tolerance
            )));
        }
        for faction in &self.factions {
            if faction.fill.trim().is_empty() {
                return Err(AnalysisError::InvalidConfig(format!(
                    "faction '{}' has an empty fill token",
                    faction.label
                )));
            }
        }
        Ok(())
    }
}
