//! Layer classification: document tree → raw path data per layer.

use tracing::debug;

use crate::config::{AnalysisConfig, GroupSelector};
use crate::document::{Document, Group};
use crate::error::AnalysisError;

/// Raw path data strings bucketed by semantic layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLayers {
    /// Filled water bodies, excluded from both factions.
    pub water: Vec<String>,
    /// Paths filled with faction A's color.
    pub faction_a: Vec<String>,
    /// Paths filled with faction B's color.
    pub faction_b: Vec<String>,
}

/// Bucket the paths of the basemap and rivers groups.
///
/// Basemap paths are sorted by fill color; paths matching neither faction
/// are ignored. A rivers path counts as water unless it is outline-only
/// (`fill:none`), since an outline encloses no area.
pub fn classify(doc: &Document, config: &AnalysisConfig) -> Result<ClassifiedLayers, AnalysisError> {
    let basemap = require_group(doc, &config.basemap)?;
    let rivers = require_group(doc, &config.rivers)?;

    let mut layers = ClassifiedLayers::default();

    for path in rivers.descendant_paths() {
        if !path.style.is_unfilled() {
            layers.water.push(path.data.clone());
        }
    }

    let [tracked, rival] = &config.factions;
    for path in basemap.descendant_paths() {
        if path.style.fill_is(&tracked.fill) {
            layers.faction_a.push(path.data.clone());
        }
        if path.style.fill_is(&rival.fill) {
            layers.faction_b.push(path.data.clone());
        }
    }

    debug!(
        water = layers.water.len(),
        faction_a = layers.faction_a.len(),
        faction_b = layers.faction_b.len(),
        "classified layer paths"
    );
    Ok(layers)
}

fn require_group<'a>(doc: &'a Document, selector: &GroupSelector) -> Result<&'a Group, AnalysisError> {
    doc.find_group(selector).ok_or_else(|| {
        let label = match &selector.id {
            Some(id) => format!("{} (id {})", selector.label, id),
            None => selector.label.clone(),
        };
        AnalysisError::LayerNotFound(label)
    })
}
