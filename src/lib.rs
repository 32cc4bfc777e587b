//! frontline: layered SVG conflict map → land controlled per faction.
//!
//! Reads the faction-colored basemap and the water layer of a map,
//! turns their paths into polygons, resolves overlaps in paint order and
//! measures the land each side holds.
//!
//! # Example
//!
//! ```no_run
//! use frontline::{analyze, metric, AnalysisConfig};
//!
//! let svg = std::fs::read_to_string("map.svg")?;
//! let config = AnalysisConfig::default();
//! let areas = analyze(&svg, &config)?;
//! let control = metric::track(&areas, Some(80.0))?;
//! println!("{}", control.report_line(&config.tracked().label));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

mod geom;

pub mod classify;
pub mod config;
pub mod cycle;
pub mod document;
pub mod error;
pub mod flatten;
pub mod metric;
pub mod post;
pub mod region;
pub mod resolve;
pub mod state;

// Re-export the geometry crates so downstream users get the same
// versions used by `Loop` and `LayerRegions`.
pub use geo;
pub use kurbo;

pub use config::{AnalysisConfig, FactionSpec, GroupSelector};
pub use cycle::{run_cycle, Publication, Revision};
pub use document::Document;
pub use error::{AnalysisError, StateError};
pub use metric::{ControlMetric, Delta, Trend};
pub use resolve::{LayerRegions, TerritoryAreas};
pub use state::{ControlSnapshot, StateStore};

use std::time::Instant;

use tracing::{debug, info};

/// Full pipeline: SVG text → land area per faction.
pub fn analyze(svg: &str, config: &AnalysisConfig) -> Result<TerritoryAreas, AnalysisError> {
    let doc = Document::parse(svg)?;
    analyze_document(&doc, config)
}

/// Pipeline on an already parsed document.
///
/// Classify paths into layers, build one region per layer, then resolve
/// overlaps. The three layers are independent until resolution, so they
/// are built in parallel.
pub fn analyze_document(doc: &Document, config: &AnalysisConfig) -> Result<TerritoryAreas, AnalysisError> {
    config.validate()?;
    let t_start = Instant::now();

    // ── Classify ──────────────────────────────────────────
    let layers = classify::classify(doc, config)?;

    // ── Flatten, repair, merge ────────────────────────────
    let (water, (faction_a, faction_b)) = rayon::join(
        || region::build_layer(&layers.water, config),
        || {
            rayon::join(
                || region::build_layer(&layers.faction_a, config),
                || region::build_layer(&layers.faction_b, config),
            )
        },
    );
    let regions = LayerRegions {
        water: water?,
        faction_a: faction_a?,
        faction_b: faction_b?,
    };
    debug!(
        water = regions.water.0.len(),
        faction_a = regions.faction_a.0.len(),
        faction_b = regions.faction_b.0.len(),
        "built layer regions"
    );

    // ── Resolve ───────────────────────────────────────────
    let areas = resolve::resolve(&regions, config);
    info!(
        tracked = %config.tracked().label,
        tracked_area = areas.faction_a,
        rival = %config.rival().label,
        rival_area = areas.faction_b,
        elapsed_ms = t_start.elapsed().as_millis() as u64,
        "measured territory"
    );
    Ok(areas)
}
