//! Route reconstruction from the predecessor links left on the grid.

use gridstar_core::{Bridge, Direction, Grid, Point};

/// Follow `dir`'s predecessor links from `from` back to `dir`'s origin,
/// yielding `from` first.
///
/// The walk is bounded by the number of cells, so even a corrupted link
/// structure cannot make it loop forever.
pub fn predecessors(grid: &Grid, from: Point, dir: Direction) -> impl Iterator<Item = Point> + '_ {
    std::iter::successors(Some(from), move |&p| {
        grid.cell(p).and_then(|c| c.state().predecessor(dir))
    })
    .take(grid.len())
}

/// Build the ordered start→end route through `found`, the cell where the
/// winning direction `dir` concluded.
///
/// The winner's own chain runs from its origin to `found`; the opposite
/// direction's chain continues from `found` to the other origin. On a
/// direct hit `found` is the other origin, so the second half is empty.
/// A backward winner's route is flipped so it always starts at the true
/// start.
pub fn reconstruct(grid: &Grid, found: Point, dir: Direction) -> Vec<Point> {
    let mut route: Vec<Point> = predecessors(grid, found, dir).collect();
    route.reverse();
    route.extend(predecessors(grid, found, dir.opposite()).skip(1));
    if dir == Direction::Backward {
        route.reverse();
    }
    route
}

/// Build the ordered start→end route across `bridge`: the forward chain
/// up to `bridge.forward`, then the backward chain from `bridge.backward`.
pub fn stitch(grid: &Grid, bridge: Bridge) -> Vec<Point> {
    let mut route: Vec<Point> = predecessors(grid, bridge.forward, Direction::Forward).collect();
    route.reverse();
    // Both ends of a bridge may be the same cell.
    let shared = usize::from(bridge.forward == bridge.backward);
    route.extend(predecessors(grid, bridge.backward, Direction::Backward).skip(shared));
    route
}
