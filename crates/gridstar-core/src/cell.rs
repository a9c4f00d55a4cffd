//! The [`Cell`] type: one lattice position and its per-direction search state.
//!
//! Coordinates and traversability are fixed at construction. The mutable
//! triplet (cost, predecessor, claim) lives in a [`CellState`] behind a
//! per-cell mutex so that two searches can share one grid.

use std::fmt;

use parking_lot::{Mutex, MutexGuard};

use crate::geom::Point;

// ---------------------------------------------------------------------------
// Direction / Claim
// ---------------------------------------------------------------------------

/// Which end of the request a search advances from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// From the true start toward the true end.
    Forward,
    /// From the true end toward the true start.
    Backward,
}

impl Direction {
    /// Both directions, forward first.
    pub const BOTH: [Direction; 2] = [Direction::Forward, Direction::Backward];

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Slot used for this direction in per-direction arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => f.write_str("forward"),
            Self::Backward => f.write_str("backward"),
        }
    }
}

/// Which direction, if any, has finalized a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Claim {
    #[default]
    Unclaimed,
    ClaimedBy(Direction),
}

// ---------------------------------------------------------------------------
// CellState
// ---------------------------------------------------------------------------

/// Cost value of a cell no search has reached yet.
pub const UNREACHED: f64 = f64::INFINITY;

/// The mutable half of a [`Cell`].
///
/// A predecessor is only ever present together with a finite cost: the
/// setters below are the only way to change either.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellState {
    cost: [f64; 2],
    predecessor: [Option<Point>; 2],
    claim: Claim,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            cost: [UNREACHED; 2],
            predecessor: [None; 2],
            claim: Claim::Unclaimed,
        }
    }
}

impl CellState {
    /// Cost-so-far from `dir`'s origin. [`UNREACHED`] if never reached,
    /// NaN if poisoned.
    #[inline]
    pub fn cost(&self, dir: Direction) -> f64 {
        self.cost[dir.index()]
    }

    #[inline]
    pub fn predecessor(&self, dir: Direction) -> Option<Point> {
        self.predecessor[dir.index()]
    }

    #[inline]
    pub fn claim(&self) -> Claim {
        self.claim
    }

    /// Whether `dir` has reached this cell with a finite cost.
    #[inline]
    pub fn is_reached(&self, dir: Direction) -> bool {
        self.cost(dir).is_finite()
    }

    /// Whether a search marked this cell as a provably unreachable endpoint.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.cost.iter().any(|c| c.is_nan())
    }

    /// Record that `dir` reaches this cell at `cost` via `pred`.
    #[inline]
    pub fn link(&mut self, dir: Direction, cost: f64, pred: Point) {
        debug_assert!(cost.is_finite());
        self.cost[dir.index()] = cost;
        self.predecessor[dir.index()] = Some(pred);
    }

    /// Make this cell the zero-cost root of `dir`'s search tree.
    #[inline]
    pub fn set_origin(&mut self, dir: Direction) {
        self.cost[dir.index()] = 0.0;
        self.predecessor[dir.index()] = None;
    }

    /// Mark the cell unreachable for both directions.
    pub fn poison(&mut self) {
        self.cost = [f64::NAN; 2];
        self.predecessor = [None; 2];
    }

    /// Test-and-set the claim for `dir`.
    ///
    /// Returns the claim seen *before* the call. Only an `Unclaimed` cell
    /// changes; a cell claimed by either direction keeps its owner.
    pub fn try_claim(&mut self, dir: Direction) -> Claim {
        let prior = self.claim;
        if prior == Claim::Unclaimed {
            self.claim = Claim::ClaimedBy(dir);
        }
        prior
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// One lattice position of a [`Grid`](crate::Grid).
///
/// Two cells are equal when their coordinates are.
pub struct Cell {
    pos: Point,
    traversable: bool,
    pub(crate) neighbors: Box<[usize]>,
    state: Mutex<CellState>,
}

impl Cell {
    pub(crate) fn new(pos: Point, traversable: bool) -> Self {
        Self {
            pos,
            traversable,
            neighbors: Box::default(),
            state: Mutex::new(CellState::default()),
        }
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn is_traversable(&self) -> bool {
        self.traversable
    }

    /// Lock the mutable state. Hold the guard only for one read-modify-write.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, CellState> {
        self.state.lock()
    }

    /// Copy of the current state.
    #[inline]
    pub fn state(&self) -> CellState {
        *self.state.lock()
    }

    pub(crate) fn reset(&mut self) {
        *self.state.get_mut() = CellState::default();
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl Eq for Cell {}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("pos", &self.pos)
            .field("traversable", &self.traversable)
            .field("state", &self.state())
            .finish()
    }
}
