//! One direction of a (possibly bidirectional) A* search.
//!
//! A [`DirectionalSearch`] advances from an origin toward a target over a
//! shared [`Grid`]. It owns its frontier but reads and writes only its own
//! half of every cell's cost/predecessor pair, under that cell's lock.
//!
//! Each direction is a complete A* search on its own, and it also expands
//! cells the opposite direction has claimed, so every cell it expands holds
//! its final cost. Wherever an expanded cell touches the opposite tree, the
//! junction is offered to the grid as a [`Bridge`]. A direction concludes
//! once the lowest estimate left in its frontier is no better than the
//! cheapest bridge: no route through unexplored cells can beat it anymore.
//!
//! Cancellation is cooperative: the grid's `solved` flag is checked at the
//! top of every iteration and under every per-cell lock before mutating.

use std::cmp::Ordering;

use gridstar_core::{Bridge, Cell, Claim, Direction, Grid, Point};
use log::{debug, trace};

use crate::distance::euclidean;
use crate::open_set::{NodeRef, OpenSet};

/// How a [`DirectionalSearch`] ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Popped its own target and won the race to declare the grid solved.
    Hit(Point),
    /// Proved the grid's best bridge shortest and won the race.
    Met(Bridge),
    /// Ran out of frontier: the target is unreachable from the origin.
    Exhausted,
    /// Someone else declared the grid solved first.
    Preempted,
}

impl Outcome {
    /// Whether this search won and a route can be built from its result.
    #[inline]
    pub fn is_found(self) -> bool {
        matches!(self, Self::Hit(_) | Self::Met(_))
    }
}

/// A* from `origin` to `target` using `dir`'s half of the shared cell state.
pub struct DirectionalSearch<'g> {
    grid: &'g Grid,
    origin: Point,
    target: Point,
    dir: Direction,
    open: OpenSet,
    expanded: usize,
}

impl<'g> DirectionalSearch<'g> {
    /// Both endpoints should be traversable cells of `grid`. An origin
    /// outside the grid ends the search as [`Outcome::Exhausted`].
    pub fn new(grid: &'g Grid, origin: Point, target: Point, dir: Direction) -> Self {
        Self {
            grid,
            origin,
            target,
            dir,
            open: OpenSet::new(),
            expanded: 0,
        }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Number of cells this search expanded.
    #[inline]
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Run until the target is hit, a bridge is proven shortest, the
    /// frontier is exhausted, or another party solves the grid.
    pub fn run(&mut self) -> Outcome {
        debug!(
            "[{}] search {} -> {} started",
            self.dir, self.origin, self.target
        );
        let outcome = self.search();
        debug!(
            "[{}] search ended: {:?} after {} expansions ({} left in frontier)",
            self.dir,
            outcome,
            self.expanded,
            self.open.len()
        );
        outcome
    }

    fn search(&mut self) -> Outcome {
        let grid = self.grid;
        let Some(origin) = grid.cell(self.origin) else {
            return Outcome::Exhausted;
        };
        if !self.seed(origin) {
            return Outcome::Preempted;
        }
        let across = Claim::ClaimedBy(self.dir.opposite());

        loop {
            if grid.is_solved() {
                return Outcome::Preempted;
            }
            if let Some(bridge) = grid.bridge() {
                if self.open.peek_f().is_none_or(|f| f >= bridge.cost) {
                    return self.conclude(bridge);
                }
            }
            let Some(node) = self.open.pop() else {
                break;
            };
            let Some(cell) = grid.cell(node.pos) else {
                continue;
            };

            if node.pos == self.target {
                return if grid.try_declare_solved() {
                    Outcome::Hit(node.pos)
                } else {
                    trace!("[{}] reached {} after the grid was solved", self.dir, node.pos);
                    Outcome::Preempted
                };
            }

            let (prior, g, rest) = {
                let mut st = cell.lock();
                if grid.is_solved() {
                    return Outcome::Preempted;
                }
                let g = st.cost(self.dir);
                // Outdated copy of a cell whose cost improved after this push.
                if node.g > g {
                    continue;
                }
                (st.try_claim(self.dir), g, st.cost(self.dir.opposite()))
            };
            if prior == across {
                self.offer(node.pos, node.pos, g + rest);
            }

            self.expanded += 1;
            if !self.expand(cell, g) {
                return Outcome::Preempted;
            }
        }

        if let Some(bridge) = grid.bridge() {
            return self.conclude(bridge);
        }
        self.poison_endpoints();
        Outcome::Exhausted
    }

    /// Root the search at `origin`. Returns `false` if already preempted.
    fn seed(&mut self, origin: &Cell) -> bool {
        {
            let mut st = origin.lock();
            if self.grid.is_solved() {
                return false;
            }
            st.set_origin(self.dir);
        }
        self.open.push(NodeRef {
            pos: self.origin,
            g: 0.0,
            f: euclidean(self.origin, self.target),
        });
        true
    }

    /// Relax every neighbour of `cell` not already claimed by this
    /// direction, and offer a bridge to each one the opposite direction
    /// claimed. Returns `false` if the grid got solved meanwhile.
    fn expand(&mut self, cell: &Cell, g: f64) -> bool {
        let grid = self.grid;
        let from = cell.pos();
        let across = Claim::ClaimedBy(self.dir.opposite());
        for n in grid.neighbors(cell) {
            let to = n.pos();
            let candidate = g + euclidean(from, to);
            let rest = {
                let mut st = n.lock();
                if grid.is_solved() {
                    return false;
                }
                let claim = st.claim();
                if claim == Claim::ClaimedBy(self.dir) {
                    continue;
                }
                // Only a strict improvement relinks; NaN compares as neither.
                if candidate.partial_cmp(&st.cost(self.dir)) == Some(Ordering::Less) {
                    st.link(self.dir, candidate, from);
                    self.open.push(NodeRef {
                        pos: to,
                        g: candidate,
                        f: candidate + euclidean(to, self.target),
                    });
                }
                (claim == across).then(|| st.cost(self.dir.opposite()))
            };
            if let Some(rest) = rest {
                self.offer(from, to, candidate + rest);
            }
        }
        true
    }

    /// Offer the junction between `own`, on this direction's tree, and
    /// `other`, on the opposite one.
    fn offer(&self, own: Point, other: Point, cost: f64) {
        if !cost.is_finite() {
            return;
        }
        let bridge = match self.dir {
            Direction::Forward => Bridge {
                forward: own,
                backward: other,
                cost,
            },
            Direction::Backward => Bridge {
                forward: other,
                backward: own,
                cost,
            },
        };
        if self.grid.offer_bridge(bridge) {
            trace!(
                "[{}] bridge {} -> {} at cost {:.3}",
                self.dir, bridge.forward, bridge.backward, cost
            );
        }
    }

    /// Declare the grid solved with the best bridge known at that moment.
    fn conclude(&self, bridge: Bridge) -> Outcome {
        if self.grid.try_declare_solved() {
            // A solved grid accepts no more bridges.
            Outcome::Met(self.grid.bridge().unwrap_or(bridge))
        } else {
            trace!("[{}] bridge proven after the grid was solved", self.dir);
            Outcome::Preempted
        }
    }

    /// Mark both endpoints unreachable, unless the grid got solved.
    fn poison_endpoints(&self) {
        for p in [self.origin, self.target] {
            let Some(cell) = self.grid.cell(p) else {
                continue;
            };
            let mut st = cell.lock();
            if self.grid.is_solved() {
                return;
            }
            st.poison();
        }
        debug!(
            "[{}] no path between {} and {}",
            self.dir, self.origin, self.target
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{reconstruct, stitch};

    fn grid(s: &str) -> Grid {
        Grid::parse(s).unwrap()
    }

    fn run(g: &Grid, from: Point, to: Point, dir: Direction) -> Outcome {
        DirectionalSearch::new(g, from, to, dir).run()
    }

    fn row(y: i32, xs: std::ops::Range<i32>) -> Vec<Point> {
        xs.map(|x| Point::new(x, y)).collect()
    }

    /// Pretend `dir` already expanded the straight chain `cells`, rooted
    /// at the first one.
    fn claim_chain(g: &Grid, dir: Direction, cells: &[Point]) {
        for (i, &p) in cells.iter().enumerate() {
            let mut st = g.cell(p).unwrap().lock();
            if i == 0 {
                st.set_origin(dir);
            } else {
                st.link(dir, i as f64, cells[i - 1]);
            }
            st.try_claim(dir);
        }
    }

    #[test]
    fn hit_on_open_grid() {
        let g = Grid::open(6, 4).unwrap();
        let out = run(&g, Point::new(0, 0), Point::new(5, 3), Direction::Forward);
        assert_eq!(out, Outcome::Hit(Point::new(5, 3)));
        assert!(g.is_solved());

        let route = reconstruct(&g, Point::new(5, 3), Direction::Forward);
        assert_eq!(route.first(), Some(&Point::new(0, 0)));
        assert_eq!(route.last(), Some(&Point::new(5, 3)));
        // 3 diagonal steps + 2 straight ones
        assert_eq!(route.len(), 6);
    }

    #[test]
    fn start_equals_target() {
        let g = Grid::open(3, 3).unwrap();
        let p = Point::new(1, 1);
        assert_eq!(run(&g, p, p, Direction::Backward), Outcome::Hit(p));
        assert_eq!(reconstruct(&g, p, Direction::Backward), vec![p]);
    }

    #[test]
    fn exhaustion_poisons_both_endpoints() {
        let g = grid(
            "
            ..#..
            ..#..
            ..#..
            ",
        );
        let (a, b) = (Point::new(0, 0), Point::new(4, 2));
        let mut search = DirectionalSearch::new(&g, a, b, Direction::Forward);
        assert_eq!(search.run(), Outcome::Exhausted);
        assert_eq!(search.expanded(), 6);
        assert!(!g.is_solved());
        for p in [a, b] {
            let st = g.cell(p).unwrap().state();
            assert!(st.is_poisoned());
            assert_eq!(st.predecessor(Direction::Forward), None);
            assert_eq!(st.predecessor(Direction::Backward), None);
        }
    }

    #[test]
    fn origin_off_the_grid_is_exhausted() {
        let g = Grid::open(3, 3).unwrap();
        let mut search =
            DirectionalSearch::new(&g, Point::new(-1, 0), Point::new(2, 2), Direction::Forward);
        assert_eq!(search.run(), Outcome::Exhausted);
        assert_eq!(search.expanded(), 0);
        assert!(!g.is_solved());
        assert!(g.cells().all(|c| !c.state().is_reached(Direction::Forward)));
    }

    #[test]
    fn solved_grid_preempts_without_touching_state() {
        let g = Grid::open(4, 4).unwrap();
        assert!(g.try_declare_solved());
        let mut search =
            DirectionalSearch::new(&g, Point::new(0, 0), Point::new(3, 3), Direction::Forward);
        assert_eq!(search.run(), Outcome::Preempted);
        assert_eq!(search.expanded(), 0);
        let origin = g.cell(Point::new(0, 0)).unwrap().state();
        assert!(!origin.is_reached(Direction::Forward));
    }

    #[test]
    fn meets_opposite_claims() {
        let g = Grid::open(5, 2).unwrap();
        let end = Point::new(4, 0);
        claim_chain(&g, Direction::Backward, &[end, Point::new(3, 0)]);

        let out = run(&g, Point::new(0, 0), end, Direction::Forward);
        let bridge = Bridge {
            forward: Point::new(2, 0),
            backward: Point::new(3, 0),
            cost: 4.0,
        };
        assert_eq!(out, Outcome::Met(bridge));
        assert_eq!(stitch(&g, bridge), row(0, 0..5));
    }

    #[test]
    fn backward_winner_route_still_runs_start_to_end() {
        let g = Grid::open(5, 2).unwrap();
        let start = Point::new(0, 0);
        claim_chain(&g, Direction::Forward, &[start, Point::new(1, 0)]);

        let out = run(&g, Point::new(4, 0), start, Direction::Backward);
        let bridge = Bridge {
            forward: Point::new(1, 0),
            backward: Point::new(2, 0),
            cost: 4.0,
        };
        assert_eq!(out, Outcome::Met(bridge));
        assert_eq!(stitch(&g, bridge), row(0, 0..5));
    }

    #[test]
    fn keeps_searching_past_a_costly_first_meeting() {
        // The backward tree holds the end, its neighbour (5,1) and a far
        // too expensive cell (1,0) right next to the start.
        let g = Grid::open(7, 3).unwrap();
        let (start, end) = (Point::new(0, 1), Point::new(6, 1));
        claim_chain(&g, Direction::Backward, &[end, Point::new(5, 1)]);
        {
            let mut st = g.cell(Point::new(1, 0)).unwrap().lock();
            st.link(Direction::Backward, 20.0, end);
            st.try_claim(Direction::Backward);
        }

        let out = run(&g, start, end, Direction::Forward);
        let bridge = Bridge {
            forward: Point::new(4, 1),
            backward: Point::new(5, 1),
            cost: 6.0,
        };
        assert_eq!(out, Outcome::Met(bridge));
        assert_eq!(g.bridge(), Some(bridge));
        assert_eq!(stitch(&g, bridge), row(1, 0..7));
    }

    #[test]
    fn losing_the_final_race_preempts() {
        let g = Grid::open(5, 2).unwrap();
        let search =
            DirectionalSearch::new(&g, Point::new(0, 0), Point::new(4, 0), Direction::Forward);
        let bridge = Bridge {
            forward: Point::new(2, 0),
            backward: Point::new(3, 0),
            cost: 4.0,
        };
        assert!(g.offer_bridge(bridge));
        assert!(g.try_declare_solved());
        assert_eq!(search.conclude(bridge), Outcome::Preempted);
    }

    #[test]
    fn poisoned_costs_never_become_bridges() {
        let g = Grid::open(3, 2).unwrap();
        let search =
            DirectionalSearch::new(&g, Point::new(0, 0), Point::new(2, 0), Direction::Backward);
        search.offer(Point::new(0, 0), Point::new(1, 0), 1.0 + f64::NAN);
        assert_eq!(g.bridge(), None);
    }
}
