//! Zero-width offset of a single ring.
//!
//! Nodes the ring at each place it crosses or touches itself and splits it
//! there, until every piece is simple. Collinear runs and spikes are
//! dropped first, which removes zero-width slivers without changing area.
//! Pieces that end up with no area vanish.
//!
//! Unlike a planar-graph buffer, both lobes of a figure-eight survive
//! regardless of their winding. A twist nested inside the outer ring is
//! returned as an overlapping piece rather than a hole; the layer union
//! absorbs it.

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Coord, Line};

use crate::geom::signed_area;

/// Sine of the turning angle below which a vertex counts as collinear.
const COLLINEAR_SIN: f64 = 1e-10;

/// Pieces with less area than this fraction of their squared extent are
/// numerically empty.
const EMPTY_AREA_RATIO: f64 = 1e-12;

/// Split an open ring (closing edge implicit) into simple rings.
pub fn buffer_zero(ring: &[Coord<f64>]) -> Vec<Vec<Coord<f64>>> {
    let mut pending = vec![ring.to_vec()];
    let mut simple = Vec::new();

    // Every split yields two rings strictly shorter than their parent,
    // so this terminates.
    while let Some(mut ring) = pending.pop() {
        normalize(&mut ring);
        if ring.len() < 3 {
            continue;
        }
        // Net area only means something once the ring is simple: opposite
        // lobes of a figure-eight cancel out.
        match first_crossing(&ring) {
            None if is_empty(&ring) => {}
            None => simple.push(ring),
            Some((i, j, at)) => {
                let (head, tail) = split(&ring, i, j, at);
                pending.push(tail);
                pending.push(head);
            }
        }
    }
    simple
}

/// Drop repeated points and collinear vertices until none remain.
fn normalize(ring: &mut Vec<Coord<f64>>) {
    loop {
        ring.dedup();
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        let n = ring.len();
        if n < 3 {
            return;
        }
        let keep: Vec<bool> = (0..n)
            .map(|k| !is_collinear(ring[(k + n - 1) % n], ring[k], ring[(k + 1) % n]))
            .collect();
        if keep.iter().all(|&k| k) {
            return;
        }
        let mut flags = keep.into_iter();
        ring.retain(|_| flags.next().unwrap_or(true));
    }
}

/// True when `b` lies on the line through `a` and `c`, straight through
/// or as the tip of a spike.
fn is_collinear(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> bool {
    let u = b - a;
    let v = c - b;
    let cross = u.x * v.y - u.y * v.x;
    let scale = u.x.hypot(u.y) * v.x.hypot(v.y);
    cross.abs() <= COLLINEAR_SIN * scale
}

fn is_empty(ring: &[Coord<f64>]) -> bool {
    if ring.len() < 3 {
        return true;
    }
    let (mut min, mut max) = (ring[0], ring[0]);
    for c in ring {
        min.x = min.x.min(c.x);
        min.y = min.y.min(c.y);
        max.x = max.x.max(c.x);
        max.y = max.y.max(c.y);
    }
    let extent = (max.x - min.x).max(max.y - min.y);
    signed_area(ring).abs() <= EMPTY_AREA_RATIO * extent * extent
}

fn edge(ring: &[Coord<f64>], i: usize) -> Line<f64> {
    Line::new(ring[i], ring[(i + 1) % ring.len()])
}

/// First pair of non-adjacent edges `(i, j)`, `i < j`, that share a point,
/// with a point they share.
fn first_crossing(ring: &[Coord<f64>]) -> Option<(usize, usize, Coord<f64>)> {
    let n = ring.len();
    for i in 0..n {
        let a = edge(ring, i);
        for j in (i + 2)..n {
            // Edge n-1 closes onto edge 0.
            if i == 0 && j == n - 1 {
                continue;
            }
            let at = match line_intersection(a, edge(ring, j)) {
                Some(LineIntersection::SinglePoint { intersection, .. }) => intersection,
                Some(LineIntersection::Collinear { intersection }) => intersection.start,
                None => continue,
            };
            return Some((i, j, at));
        }
    }
    None
}

/// Split at a point shared by edges `i` and `j`:
/// head = `at, v[i+1] ..= v[j]`, tail = `at, v[j+1] .. v[n-1], v[0] ..= v[i]`.
fn split(
    ring: &[Coord<f64>],
    i: usize,
    j: usize,
    at: Coord<f64>,
) -> (Vec<Coord<f64>>, Vec<Coord<f64>>) {
    let mut head = Vec::with_capacity(j - i + 1);
    head.push(at);
    head.extend_from_slice(&ring[i + 1..=j]);

    let mut tail = Vec::with_capacity(ring.len() - (j - i) + 1);
    tail.push(at);
    tail.extend_from_slice(&ring[j + 1..]);
    tail.extend_from_slice(&ring[..=i]);
    (head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::coord;

    fn ring(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| coord! { x: x, y: y }).collect()
    }

    #[test]
    fn simple_ring_is_untouched() {
        let square = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        assert_eq!(buffer_zero(&square), vec![square]);
    }

    #[test]
    fn bowtie_splits_into_both_lobes() {
        let bowtie = ring(&[(0.0, 0.0), (4.0, 4.0), (4.0, 0.0), (0.0, 4.0)]);
        let pieces = buffer_zero(&bowtie);
        assert_eq!(pieces.len(), 2);
        for piece in &pieces {
            assert_eq!(piece.len(), 3);
            assert!((signed_area(piece).abs() - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn balanced_lobes_are_not_mistaken_for_empty() {
        // Top and bottom lobes of equal size: the net winding is zero.
        let hourglass = ring(&[(0.0, 0.0), (4.0, 4.0), (0.0, 4.0), (4.0, 0.0)]);
        assert!(signed_area(&hourglass).abs() < 1e-12);

        let pieces = buffer_zero(&hourglass);
        assert_eq!(pieces.len(), 2);
        let total: f64 = pieces.iter().map(|p| signed_area(p).abs()).sum();
        assert!((total - 8.0).abs() < 1e-9);
    }

    #[test]
    fn spike_is_removed() {
        // Square with a zero-width spike poking out of its top edge.
        let spiked = ring(&[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 4.0),
            (2.0, 4.0),
            (2.0, 9.0),
            (2.0, 4.0),
            (0.0, 4.0),
        ]);
        let pieces = buffer_zero(&spiked);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].len(), 4);
        assert!((signed_area(&pieces[0]) - 16.0).abs() < 1e-9);
    }

    #[test]
    fn ring_touching_itself_at_a_vertex() {
        // Two squares sharing the corner (2, 2), traced as one ring.
        let touching = ring(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (4.0, 2.0),
            (4.0, 4.0),
            (2.0, 4.0),
            (2.0, 2.0),
            (0.0, 2.0),
        ]);
        let pieces = buffer_zero(&touching);
        assert_eq!(pieces.len(), 2);
        let total: f64 = pieces.iter().map(|p| signed_area(p).abs()).sum();
        assert!((total - 8.0).abs() < 1e-9);
    }

    #[test]
    fn flat_ring_vanishes() {
        let flat = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (1.0, 0.0)]);
        assert!(buffer_zero(&flat).is_empty());
    }
}
