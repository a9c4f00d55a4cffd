use gridstar_core::Point;

/// Euclidean (L2) distance between two points.
///
/// Used both as the edge cost between neighbours (1 orthogonal, √2
/// diagonal) and as the A* heuristic, for which it is admissible and
/// consistent on the 8-connected lattice.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    dx.hypot(dy)
}

/// Chebyshev (L∞) distance: the minimum number of 8-connected steps
/// between two points on an open lattice.
#[inline]
pub fn chebyshev(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs().max((a.y - b.y).abs())
}
