//! The [`Grid`] type: a dense W×H lattice of [`Cell`]s shared by searches.
//!
//! Adjacency is computed once at construction: every traversable cell lists
//! its traversable 8-neighbours, clipped at the borders. Walls have no
//! neighbours and are nobody's neighbour.
//!
//! A grid carries one search's worth of state. After a search, call
//! [`reset`](Grid::reset) before running another one on the same grid;
//! nothing resets it automatically, and running two unrelated searches on a
//! live grid is a caller error that goes undetected.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::cell::Cell;
use crate::error::GridError;
use crate::geom::{Point, Range};

/// Where the forward and backward search trees touch.
///
/// The route runs along the forward chain to `forward`, then along the
/// backward chain from `backward` to the end. The two are the same cell or
/// 8-neighbours, and `cost` is the length of that route.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bridge {
    pub forward: Point,
    pub backward: Point,
    pub cost: f64,
}

/// A 2D occupancy grid with per-cell search state.
pub struct Grid {
    cells: Vec<Cell>,
    bounds: Range,
    width: usize,
    solved: AtomicBool,
    bridge: Mutex<Option<Bridge>>,
}

impl Grid {
    /// Smallest accepted width and height.
    pub const MIN_SIDE: i32 = 2;

    /// Build a grid from row-major traversability data.
    pub fn new(width: i32, height: i32, traversable: Vec<bool>) -> Result<Self, GridError> {
        if width < Self::MIN_SIDE || height < Self::MIN_SIDE {
            return Err(GridError::TooSmall { width, height });
        }
        let bounds = Range::new(0, 0, width, height);
        if traversable.len() != bounds.len() {
            return Err(GridError::SizeMismatch {
                expected: bounds.len(),
                actual: traversable.len(),
            });
        }

        let cells = bounds
            .iter()
            .zip(traversable)
            .map(|(p, t)| Cell::new(p, t))
            .collect();
        let mut grid = Self {
            cells,
            bounds,
            width: width as usize,
            solved: AtomicBool::new(false),
            bridge: Mutex::new(None),
        };
        grid.link_neighbors();
        Ok(grid)
    }

    /// Build a grid by asking `traversable` about every position.
    pub fn from_fn(
        width: i32,
        height: i32,
        traversable: impl Fn(Point) -> bool,
    ) -> Result<Self, GridError> {
        let data = Range::new(0, 0, width.max(0), height.max(0))
            .iter()
            .map(traversable)
            .collect();
        Self::new(width, height, data)
    }

    /// A grid with no walls.
    pub fn open(width: i32, height: i32) -> Result<Self, GridError> {
        Self::from_fn(width, height, |_| true)
    }

    /// Parse an ASCII map: `.` is floor, `#` is wall, one line per row.
    ///
    /// Surrounding whitespace is trimmed from the whole string and from
    /// each line, so indented literals are accepted.
    pub fn parse(s: &str) -> Result<Self, GridError> {
        let mut data = Vec::new();
        let mut width = None;
        let mut height = 0usize;

        for (y, line) in s.trim().lines().enumerate() {
            let line = line.trim();
            let mut w = 0usize;
            for (x, ch) in line.chars().enumerate() {
                match ch {
                    '.' => data.push(true),
                    '#' => data.push(false),
                    _ => {
                        return Err(GridError::InvalidChar {
                            ch,
                            pos: Point::new(x as i32, y as i32),
                        });
                    }
                }
                w += 1;
            }
            match width {
                None => width = Some(w),
                Some(expected) if expected != w => {
                    return Err(GridError::RaggedRow {
                        row: y,
                        expected,
                        actual: w,
                    });
                }
                Some(_) => {}
            }
            height += 1;
        }

        Self::new(width.unwrap_or(0) as i32, height as i32, data)
    }

    fn link_neighbors(&mut self) {
        for i in 0..self.cells.len() {
            if !self.cells[i].is_traversable() {
                continue;
            }
            let pos = self.cells[i].pos();
            let neighbors: Box<[usize]> = pos
                .neighbors_8()
                .into_iter()
                .filter_map(|n| self.idx(n))
                .filter(|&ni| self.cells[ni].is_traversable())
                .collect();
            self.cells[i].neighbors = neighbors;
        }
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a grid has at least 2×2 cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        Some(p.y as usize * self.width + p.x as usize)
    }

    // -----------------------------------------------------------------------
    // Cells
    // -----------------------------------------------------------------------

    /// The cell at `p`, or `None` outside the bounds.
    #[inline]
    pub fn cell(&self, p: Point) -> Option<&Cell> {
        self.idx(p).map(|i| &self.cells[i])
    }

    /// Row-major iterator over all cells.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Traversable 8-neighbours of `cell`.
    pub fn neighbors<'a>(&'a self, cell: &'a Cell) -> impl Iterator<Item = &'a Cell> {
        cell.neighbors.iter().map(move |&i| &self.cells[i])
    }

    // -----------------------------------------------------------------------
    // Search lifecycle
    // -----------------------------------------------------------------------

    /// Flip `solved` from false to true.
    ///
    /// Returns `true` only for the single caller that performed the flip;
    /// every later caller gets `false` until the next [`reset`](Self::reset).
    #[inline]
    pub fn try_declare_solved(&self) -> bool {
        self.solved
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    #[inline]
    pub fn is_solved(&self) -> bool {
        self.solved.load(Ordering::Acquire)
    }

    /// Keep `bridge` if it is strictly cheaper than the best one so far.
    /// Ignored once the grid is solved.
    pub fn offer_bridge(&self, bridge: Bridge) -> bool {
        let mut best = self.bridge.lock();
        if self.is_solved() || best.is_some_and(|b| b.cost <= bridge.cost) {
            return false;
        }
        *best = Some(bridge);
        true
    }

    /// The cheapest bridge offered since the last reset.
    #[inline]
    pub fn bridge(&self) -> Option<Bridge> {
        *self.bridge.lock()
    }

    /// Restore every cell's cost, predecessor and claim, and clear `solved`
    /// and the bridge.
    ///
    /// Taking `&mut self` rules out resetting while a search borrows the grid.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset();
        }
        *self.solved.get_mut() = false;
        *self.bridge.get_mut() = None;
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("bounds", &self.bounds)
            .field("solved", &self.is_solved())
            .field("bridge", &self.bridge())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{Claim, CellState, Direction};

    fn neighbor_set(grid: &Grid, p: Point) -> Vec<Point> {
        let cell = grid.cell(p).unwrap();
        let mut ns: Vec<_> = grid.neighbors(cell).map(Cell::pos).collect();
        ns.sort();
        ns
    }

    #[test]
    fn rejects_tiny_grids() {
        assert_eq!(
            Grid::open(1, 5).unwrap_err(),
            GridError::TooSmall {
                width: 1,
                height: 5
            }
        );
        assert!(Grid::open(2, 2).is_ok());
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        let err = Grid::new(3, 3, vec![true; 8]).unwrap_err();
        assert_eq!(
            err,
            GridError::SizeMismatch {
                expected: 9,
                actual: 8
            }
        );
    }

    #[test]
    fn neighbor_counts_follow_borders() {
        let g = Grid::open(271, 192).unwrap();
        // corners
        assert_eq!(neighbor_set(&g, Point::new(0, 0)).len(), 3);
        assert_eq!(neighbor_set(&g, Point::new(270, 0)).len(), 3);
        assert_eq!(neighbor_set(&g, Point::new(0, 191)).len(), 3);
        assert_eq!(neighbor_set(&g, Point::new(270, 191)).len(), 3);
        // edges
        assert_eq!(neighbor_set(&g, Point::new(100, 0)).len(), 5);
        assert_eq!(neighbor_set(&g, Point::new(100, 191)).len(), 5);
        assert_eq!(neighbor_set(&g, Point::new(0, 100)).len(), 5);
        assert_eq!(neighbor_set(&g, Point::new(270, 100)).len(), 5);
        // interior
        assert_eq!(neighbor_set(&g, Point::new(100, 100)).len(), 8);
    }

    #[test]
    fn top_left_corner_neighbors() {
        let g = Grid::open(4, 4).unwrap();
        assert_eq!(
            neighbor_set(&g, Point::new(0, 0)),
            vec![Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn walls_are_never_neighbors() {
        let g = Grid::parse(
            "
            ...
            .#.
            ...
            ",
        )
        .unwrap();
        for cell in g.cells() {
            assert!(g.neighbors(cell).all(Cell::is_traversable));
        }
        let wall = g.cell(Point::new(1, 1)).unwrap();
        assert!(!wall.is_traversable());
        assert_eq!(g.neighbors(wall).count(), 0);
        assert_eq!(neighbor_set(&g, Point::new(0, 0)).len(), 2);
    }

    #[test]
    fn parse_reports_bad_input() {
        assert_eq!(
            Grid::parse("..\n.").unwrap_err(),
            GridError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
        assert_eq!(
            Grid::parse("..\n.x").unwrap_err(),
            GridError::InvalidChar {
                ch: 'x',
                pos: Point::new(1, 1)
            }
        );
        assert!(matches!(
            Grid::parse("...").unwrap_err(),
            GridError::TooSmall { .. }
        ));
    }

    #[test]
    fn cell_lookup_respects_bounds() {
        let g = Grid::open(3, 2).unwrap();
        assert_eq!(g.len(), 6);
        assert_eq!(g.cell(Point::new(2, 1)).unwrap().pos(), Point::new(2, 1));
        assert!(g.cell(Point::new(3, 0)).is_none());
        assert!(g.cell(Point::new(0, -1)).is_none());
    }

    #[test]
    fn solved_flag_has_one_winner() {
        let g = Grid::open(2, 2).unwrap();
        assert!(!g.is_solved());
        assert!(g.try_declare_solved());
        assert!(!g.try_declare_solved());
        assert!(g.is_solved());
    }

    #[test]
    fn concurrent_declarations_have_one_winner() {
        let g = Grid::open(2, 2).unwrap();
        let wins = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| g.try_declare_solved()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|&won| won)
                .count()
        });
        assert_eq!(wins, 1);
    }

    #[test]
    fn only_cheaper_bridges_replace_the_best() {
        let g = Grid::open(4, 4).unwrap();
        let bridge = |x, cost| Bridge {
            forward: Point::new(x, 0),
            backward: Point::new(x + 1, 0),
            cost,
        };
        assert_eq!(g.bridge(), None);
        assert!(g.offer_bridge(bridge(0, 5.0)));
        assert!(!g.offer_bridge(bridge(1, 6.5)));
        assert!(!g.offer_bridge(bridge(1, 5.0)));
        assert!(g.offer_bridge(bridge(2, 4.0)));
        assert_eq!(g.bridge(), Some(bridge(2, 4.0)));

        assert!(g.try_declare_solved());
        assert!(!g.offer_bridge(bridge(0, 1.0)));
        assert_eq!(g.bridge(), Some(bridge(2, 4.0)));
    }

    #[test]
    fn reset_restores_pristine_state() {
        let mut g = Grid::open(3, 3).unwrap();
        {
            let c = g.cell(Point::new(1, 1)).unwrap();
            let mut st = c.lock();
            st.link(Direction::Forward, 1.0, Point::new(0, 0));
            st.try_claim(Direction::Backward);
        }
        g.cell(Point::new(2, 2)).unwrap().lock().poison();
        assert!(g.offer_bridge(Bridge {
            forward: Point::new(0, 0),
            backward: Point::new(1, 1),
            cost: 2.0,
        }));
        assert!(g.try_declare_solved());

        g.reset();

        assert!(!g.is_solved());
        assert_eq!(g.bridge(), None);
        for cell in g.cells() {
            assert_eq!(cell.state(), CellState::default());
            assert_eq!(cell.state().claim(), Claim::Unclaimed);
        }
        // adjacency survives a reset
        assert_eq!(neighbor_set(&g, Point::new(1, 1)).len(), 8);
    }
}
