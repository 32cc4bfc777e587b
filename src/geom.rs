//! Shared geometry utilities.

/// Signed area of a closed point ring via the shoelace formula.
///
/// Closure is implicit: the last point connects back to the first.
/// Positive = counter-clockwise, negative = clockwise (y-up).
/// Accepts kurbo points and geo coordinates alike.
pub fn signed_area<P: Copy + Into<(f64, f64)>>(points: &[P]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let (px, py) = points[i].into();
        let (qx, qy) = points[(i + 1) % n].into();
        area += px * qy - qx * py;
    }
    area / 2.0
}
