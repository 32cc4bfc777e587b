//! Path flattening: SVG path data → closed polygonal loops.
//!
//! Parsing and curve subdivision are delegated to kurbo. Each subpath
//! becomes one [`Loop`]; open subpaths are closed implicitly, as the fill
//! rule treats them.

use kurbo::{BezPath, PathEl, Point};

use crate::error::AnalysisError;
use crate::geom::signed_area;

/// A closed ring of at least three distinct consecutive points.
/// The closing edge (last → first) is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    points: Vec<Point>,
}

impl Loop {
    /// Build a loop, dropping consecutive duplicates and a repeated
    /// closing point. Returns `None` when fewer than three points remain.
    pub fn new(mut points: Vec<Point>) -> Option<Self> {
        points.dedup();
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Shoelace area; positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        signed_area(&self.points)
    }
}

/// Flatten one path description into loops.
///
/// `tolerance` bounds the distance between each curve and its polyline,
/// in document units.
pub fn flatten(data: &str, tolerance: f64) -> Result<Vec<Loop>, AnalysisError> {
    let path = BezPath::from_svg(data)
        .map_err(|e| AnalysisError::MalformedPath(format!("{e} in {:?}", truncate(data))))?;

    let mut loops = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut start = Point::ZERO;
    kurbo::flatten(&path, tolerance, |el| match el {
        PathEl::MoveTo(p) => {
            loops.extend(Loop::new(std::mem::take(&mut current)));
            start = p;
            current.push(p);
        }
        PathEl::LineTo(p) => current.push(p),
        // Drawing may continue after `Z` without a move; it restarts at
        // the closed subpath's start.
        PathEl::ClosePath => {
            loops.extend(Loop::new(std::mem::take(&mut current)));
            current.push(start);
        }
        // The flattener only emits lines.
        PathEl::QuadTo(_, p) | PathEl::CurveTo(_, _, p) => current.push(p),
    });
    loops.extend(Loop::new(current));
    Ok(loops)
}

/// Keep error messages readable for very long map paths.
fn truncate(data: &str) -> &str {
    const MAX: usize = 48;
    match data.char_indices().nth(MAX) {
        Some((idx, _)) => &data[..idx],
        None => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Shape;

    #[test]
    fn square_round_trips_area() {
        let loops = flatten("M0,0 L10,0 L10,10 L0,10 Z", 0.01).unwrap();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].points().len(), 4);
        assert!((loops[0].signed_area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn relative_and_axis_commands() {
        let loops = flatten("m 5 5 h 10 v 10 h -10 z", 0.01).unwrap();
        assert_eq!(loops.len(), 1);
        assert!((loops[0].signed_area().abs() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn cubic_circle_matches_exact_area() {
        // Four-arc cubic approximation of a circle of radius 100.
        let k = 55.228_474_983;
        let data = format!(
            "M100,0 C100,{k} {k},100 0,100 C-{k},100 -100,{k} -100,0 \
             C-100,-{k} -{k},-100 0,-100 C{k},-100 100,-{k} 100,0 Z"
        );
        let exact = BezPath::from_svg(&data).unwrap().area();
        let loops = flatten(&data, 0.01).unwrap();
        assert_eq!(loops.len(), 1);
        let flat = loops[0].signed_area();
        assert!(loops[0].points().len() > 16);
        assert!((flat - exact).abs() / exact.abs() < 1e-3, "{flat} vs {exact}");
    }

    #[test]
    fn each_subpath_is_a_loop() {
        let loops = flatten("M0 0 L1 0 L1 1 Z M5 5 L6 5 L6 6 L5 6", 0.01).unwrap();
        assert_eq!(loops.len(), 2);
        // Open subpath closes implicitly.
        assert!((loops[1].signed_area() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_subpaths_are_dropped() {
        let loops = flatten("M0 0 L1 1 Z M2 2 Z", 0.01).unwrap();
        assert!(loops.is_empty());
    }

    #[test]
    fn unknown_command_is_malformed() {
        let err = flatten("M0 0 X 3 4 Z", 0.01).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedPath(_)));
    }

    #[test]
    fn loop_drops_closing_duplicate() {
        let l = Loop::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(l.points().len(), 3);
    }
}
