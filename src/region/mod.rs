//! Loops → valid polygons → one unioned region per layer.
//!
//! 1. Convert each loop to a polygon
//! 2. Repair invalid ones with a zero-width offset (may split them)
//! 3. Union every piece of the layer into one `MultiPolygon`

mod buffer;

use geo::orient::Direction;
use geo::{coord, BooleanOps, Coord, LineString, MultiPolygon, Orient, Polygon, Validation};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::flatten::{flatten, Loop};

pub use buffer::buffer_zero;

/// Polygon with the loop as its exterior. May be invalid if the loop
/// crosses itself.
pub fn to_polygon(ring: &Loop) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = ring
        .points()
        .iter()
        .map(|p| coord! { x: p.x, y: p.y })
        .collect();
    Polygon::new(LineString::from(coords), vec![])
}

/// Counter-clockwise polygon from finite coordinates.
fn oriented(coords: Vec<Coord<f64>>) -> Polygon<f64> {
    Polygon::new(LineString::from(coords), vec![]).orient(Direction::Default)
}

/// Turn a candidate polygon into valid simple pieces.
///
/// Valid input passes through, wound counter-clockwise. Invalid input goes through
/// [`buffer_zero`]; if any resulting piece is still invalid the run cannot
/// trust the geometry and fails.
pub fn repair(polygon: Polygon<f64>) -> Result<Vec<Polygon<f64>>, AnalysisError> {
    // No offset can make sense of infinite or NaN coordinates.
    if polygon
        .exterior()
        .coords()
        .any(|c| !c.x.is_finite() || !c.y.is_finite())
    {
        return Err(AnalysisError::GeometryRepair(
            "loop has non-finite coordinates".to_string(),
        ));
    }
    if polygon.is_valid() {
        return Ok(vec![polygon.orient(Direction::Default)]);
    }

    let (exterior, _) = polygon.into_inner();
    let mut ring = exterior.into_inner();
    // LineString keeps the closing coordinate; the offset wants an open ring.
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }

    let pieces: Vec<Polygon<f64>> = buffer_zero(&ring).into_iter().map(oriented).collect();
    if let Some(bad) = pieces.iter().find(|p| !p.is_valid()) {
        return Err(AnalysisError::GeometryRepair(format!(
            "zero-width offset left an invalid ring of {} points",
            bad.exterior().0.len()
        )));
    }
    debug!(vertices = ring.len(), pieces = pieces.len(), "repaired self-intersecting loop");
    Ok(pieces)
}

/// Repair every loop and union the pieces into one region.
pub fn merge(loops: &[Loop]) -> Result<MultiPolygon<f64>, AnalysisError> {
    let mut pieces = Vec::with_capacity(loops.len());
    for ring in loops {
        pieces.extend(repair(to_polygon(ring))?);
    }
    Ok(union_all(pieces))
}

/// Union of all polygons, as disjoint pieces.
///
/// Reduces pairwise in a balanced tree so each boolean operation sees
/// inputs of similar size. Each polygon enters as its own operand, so
/// overlapping inputs never share an operand.
pub fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut regions: Vec<MultiPolygon<f64>> = polygons
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .collect();

    while regions.len() > 1 {
        let mut next = Vec::with_capacity(regions.len() / 2 + 1);
        let mut iter = regions.into_iter();
        while let Some(a) = iter.next() {
            next.push(match iter.next() {
                Some(b) => a.union(&b),
                None => a,
            });
        }
        regions = next;
    }
    regions.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// Flatten every path of a layer and merge the loops.
///
/// A malformed path aborts the layer unless
/// [`AnalysisConfig::skip_malformed_paths`] is set.
pub fn build_layer(paths: &[String], config: &AnalysisConfig) -> Result<MultiPolygon<f64>, AnalysisError> {
    let mut loops = Vec::new();
    for data in paths {
        match flatten(data, config.flatten_tolerance) {
            Ok(found) => loops.extend(found),
            Err(err @ AnalysisError::MalformedPath(_)) if config.skip_malformed_paths => {
                warn!("skipping path: {err}");
            }
            Err(err) => return Err(err),
        }
    }
    let region = merge(&loops)?;
    debug!(paths = paths.len(), loops = loops.len(), polygons = region.0.len(), "merged layer");
    Ok(region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::signed_area;
    use geo::Area;
    use kurbo::Point;

    fn square(x: f64, y: f64, side: f64) -> Loop {
        Loop::new(vec![
            Point::new(x, y),
            Point::new(x + side, y),
            Point::new(x + side, y + side),
            Point::new(x, y + side),
        ])
        .unwrap()
    }

    #[test]
    fn figure_eight_repairs_into_two_lobes() {
        let figure_eight = Loop::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 0.0),
            Point::new(0.0, 4.0),
        ])
        .unwrap();
        // The signed shoelace of the whole figure cancels out.
        assert!(figure_eight.signed_area().abs() < 1e-12);

        let pieces = repair(to_polygon(&figure_eight)).unwrap();
        assert_eq!(pieces.len(), 2);

        let lobe_right = [Point::new(2.0, 2.0), Point::new(4.0, 4.0), Point::new(4.0, 0.0)];
        let lobe_left = [Point::new(2.0, 2.0), Point::new(0.0, 4.0), Point::new(0.0, 0.0)];
        let reference = signed_area(&lobe_right).abs() + signed_area(&lobe_left).abs();

        let repaired: f64 = pieces.iter().map(|p| p.unsigned_area()).sum();
        assert!((repaired - reference).abs() < 1e-9);
        assert!(pieces.iter().all(|p| p.is_valid()));

        let merged = merge(&[figure_eight]).unwrap();
        assert!((merged.unsigned_area() - reference).abs() < 1e-6);
    }

    #[test]
    fn valid_polygon_passes_through() {
        let pieces = repair(to_polygon(&square(0.0, 0.0, 3.0))).unwrap();
        assert_eq!(pieces.len(), 1);
        assert!((pieces[0].unsigned_area() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn non_finite_geometry_fails_repair() {
        let ring = Loop::new(vec![
            Point::new(0.0, 0.0),
            Point::new(f64::NAN, 1.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 0.0),
        ])
        .unwrap();
        assert!(matches!(
            repair(to_polygon(&ring)),
            Err(AnalysisError::GeometryRepair(_))
        ));
    }

    #[test]
    fn union_merges_overlaps() {
        let region = merge(&[
            square(0.0, 0.0, 10.0),
            square(5.0, 5.0, 10.0),
            square(50.0, 50.0, 1.0),
        ])
        .unwrap();
        assert!((region.unsigned_area() - (100.0 + 100.0 - 25.0 + 1.0)).abs() < 1e-6);
        assert_eq!(region.0.len(), 2);
    }

    #[test]
    fn union_is_idempotent() {
        let region = merge(&[square(0.0, 0.0, 10.0), square(5.0, 5.0, 10.0)]).unwrap();
        let again = region.union(&region);
        assert!((again.unsigned_area() - region.unsigned_area()).abs() < 1e-6);
    }

    #[test]
    fn empty_layer_is_empty_region() {
        let region = build_layer(&[], &AnalysisConfig::default()).unwrap();
        assert!(region.0.is_empty());
        assert_eq!(region.unsigned_area(), 0.0);
    }

    #[test]
    fn malformed_path_policy() {
        let paths = vec!["M0 0 H10 V10 H0 Z".to_string(), "M0 0 Q".to_string()];
        let strict = AnalysisConfig::default();
        assert!(matches!(
            build_layer(&paths, &strict),
            Err(AnalysisError::MalformedPath(_))
        ));

        let lenient = AnalysisConfig {
            skip_malformed_paths: true,
            ..AnalysisConfig::default()
        };
        let region = build_layer(&paths, &lenient).unwrap();
        assert!((region.unsigned_area() - 100.0).abs() < 1e-6);
    }
}
