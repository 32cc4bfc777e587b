//! Territorial resolution: overlapping layers → disjoint land per faction.
//!
//! The map paints faction A as a base layer, faction B over it, and water
//! on top of both. The differences below replay that paint order:
//!
//! 1. `a_land = faction_a − water`
//! 2. `b_land = faction_b − water`
//! 3. `a_land = a_land − b_land`
//!
//! Which faction is subtracted in step 3 follows
//! [`FactionSpec::precedence`](crate::config::FactionSpec), so a map that
//! swaps its paint order needs a config change, not a code change.

use geo::{Area, BooleanOps, MultiPolygon};
use tracing::debug;

use crate::config::AnalysisConfig;

/// Merged geometry of the three semantic layers.
#[derive(Debug, Clone)]
pub struct LayerRegions {
    pub water: MultiPolygon<f64>,
    pub faction_a: MultiPolygon<f64>,
    pub faction_b: MultiPolygon<f64>,
}

/// Disjoint, water-free land of each faction.
#[derive(Debug, Clone)]
pub struct ResolvedLands {
    pub faction_a: MultiPolygon<f64>,
    pub faction_b: MultiPolygon<f64>,
}

/// Land area per faction, in document units squared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerritoryAreas {
    pub faction_a: f64,
    pub faction_b: f64,
}

impl ResolvedLands {
    pub fn areas(&self) -> TerritoryAreas {
        TerritoryAreas {
            faction_a: self.faction_a.unsigned_area(),
            faction_b: self.faction_b.unsigned_area(),
        }
    }
}

/// Remove water from both factions, then give contested land to the
/// faction painted on top. On equal precedence faction B wins, as the
/// later layer in paint order.
pub fn resolve_lands(layers: &LayerRegions, config: &AnalysisConfig) -> ResolvedLands {
    let a_land = layers.faction_a.difference(&layers.water);
    let b_land = layers.faction_b.difference(&layers.water);

    if config.rival().precedence >= config.tracked().precedence {
        ResolvedLands {
            faction_a: a_land.difference(&b_land),
            faction_b: b_land,
        }
    } else {
        ResolvedLands {
            faction_b: b_land.difference(&a_land),
            faction_a: a_land,
        }
    }
}

/// Resolve the layers and measure each faction's land.
pub fn resolve(layers: &LayerRegions, config: &AnalysisConfig) -> TerritoryAreas {
    let areas = resolve_lands(layers, config).areas();
    debug!(
        water = layers.water.unsigned_area(),
        faction_a = areas.faction_a,
        faction_b = areas.faction_b,
        "resolved territory"
    );
    areas
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, Polygon};

    fn square(x: f64, y: f64, side: f64) -> MultiPolygon<f64> {
        let p: Polygon<f64> = polygon![
            (x: x, y: y),
            (x: x + side, y: y),
            (x: x + side, y: y + side),
            (x: x, y: y + side)
        ];
        MultiPolygon::new(vec![p])
    }

    fn empty() -> MultiPolygon<f64> {
        MultiPolygon::new(vec![])
    }

    #[test]
    fn water_swallows_faction() {
        let layers = LayerRegions {
            water: square(0.0, 0.0, 10.0),
            faction_a: square(0.0, 0.0, 10.0),
            faction_b: empty(),
        };
        let areas = resolve(&layers, &AnalysisConfig::default());
        assert!(areas.faction_a.abs() < 1e-9);
        assert!(areas.faction_b.abs() < 1e-9);
    }

    #[test]
    fn rival_paints_over_tracked() {
        // A covers 0..10 x 0..10, B covers 5..10 x 0..5 on top of it.
        let layers = LayerRegions {
            water: empty(),
            faction_a: square(0.0, 0.0, 10.0),
            faction_b: square(5.0, 0.0, 5.0),
        };
        let areas = resolve(&layers, &AnalysisConfig::default());
        assert!((areas.faction_a - 75.0).abs() < 1e-6);
        assert!((areas.faction_b - 25.0).abs() < 1e-6);
    }

    #[test]
    fn precedence_is_configurable() {
        let mut config = AnalysisConfig::default();
        config.factions[0].precedence = 5;
        let layers = LayerRegions {
            water: empty(),
            faction_a: square(0.0, 0.0, 10.0),
            faction_b: square(5.0, 0.0, 5.0),
        };
        let areas = resolve(&layers, &config);
        assert!((areas.faction_a - 100.0).abs() < 1e-6);
        assert!(areas.faction_b.abs() < 1e-6);
    }

    #[test]
    fn resolved_lands_are_disjoint_and_dry() {
        let layers = LayerRegions {
            water: square(8.0, 8.0, 4.0),
            faction_a: square(0.0, 0.0, 10.0),
            faction_b: square(6.0, 6.0, 10.0),
        };
        let lands = resolve_lands(&layers, &AnalysisConfig::default());
        assert!(lands.faction_a.intersection(&lands.faction_b).unsigned_area() < 1e-6);
        assert!(lands.faction_a.intersection(&layers.water).unsigned_area() < 1e-6);
        assert!(lands.faction_b.intersection(&layers.water).unsigned_area() < 1e-6);

        let areas = lands.areas();
        let raw_union = layers.faction_a.union(&layers.faction_b).unsigned_area();
        assert!(areas.faction_a + areas.faction_b <= raw_union + 1e-6);
    }

    #[test]
    fn empty_layers_resolve_to_zero() {
        let layers = LayerRegions {
            water: empty(),
            faction_a: empty(),
            faction_b: empty(),
        };
        let areas = resolve(&layers, &AnalysisConfig::default());
        assert_eq!(areas, TerritoryAreas { faction_a: 0.0, faction_b: 0.0 });
    }
}
