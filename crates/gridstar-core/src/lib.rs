//! **gridstar-core**: the shared occupancy grid searched by gridstar.
//!
//! This crate provides the lattice geometry, the per-cell search record
//! ([`Cell`] / [`CellState`]) and the [`Grid`] that owns the cells, their
//! precomputed 8-neighbour adjacency and the grid-wide `solved` flag used
//! to arbitrate between concurrent searches.
//!
//! # Synchronisation
//!
//! Each cell's cost/predecessor/claim triplet sits behind its own mutex and
//! is only touched through a short-lived [`Cell::lock`] guard. The `solved`
//! flag is a single atomic with compare-and-swap semantics
//! ([`Grid::try_declare_solved`]); it is the only arbiter of which search
//! gets to finalize a result. The cheapest known junction between the two
//! search trees is kept next to it as the grid's [`Bridge`].

pub mod cell;
pub mod error;
pub mod geom;
pub mod grid;

pub use cell::{Cell, CellState, Claim, Direction, UNREACHED};
pub use error::GridError;
pub use geom::{Point, Range};
pub use grid::{Bridge, Grid};
