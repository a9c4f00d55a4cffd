//! Shortest-route search over a shared [`gridstar_core::Grid`].
//!
//! The entry point is [`PathFinder`], which runs either
//!
//! - a single forward **A\*** search on the calling thread
//!   ([`SearchMode::Single`]), or
//! - two concurrent searches, one from each end, that stop once either
//!   reaches its target or proves the cheapest junction between the two
//!   search trees shortest ([`SearchMode::Dual`]).
//!
//! Both directions write into the same grid: each owns its half of every
//! cell's cost/predecessor pair, while claims, the grid's best
//! [`Bridge`](gridstar_core::Bridge) and its `solved` flag decide which
//! direction concludes the search. Both modes return routes of the same,
//! shortest length. Routes are returned as
//! start-to-end `Vec<Point>`s, empty when no route exists.
//!
//! A grid carries the state of the last search; reset it with
//! [`Grid::reset`](gridstar_core::Grid::reset) before searching it again.
//!
//! ```
//! use gridstar_core::{Grid, Point};
//! use gridstar_paths::{PathFinder, SearchConfig};
//!
//! let mut grid = Grid::parse(
//!     "
//!     ....
//!     .##.
//!     ....
//!     ",
//! )
//! .unwrap();
//! let finder = PathFinder::new(SearchConfig::dual());
//! let route = finder.find_path(&grid, Point::new(0, 1), Point::new(3, 1)).unwrap();
//! assert_eq!(route.first(), Some(&Point::new(0, 1)));
//! assert_eq!(route.last(), Some(&Point::new(3, 1)));
//! grid.reset();
//! ```

mod config;
mod distance;
mod error;
mod finder;
mod open_set;
mod route;
mod search;

pub use config::{SearchConfig, SearchMode};
pub use distance::{chebyshev, euclidean};
pub use error::{Endpoint, SearchError};
pub use finder::{PathFinder, SearchResult, Termination};
pub use route::{predecessors, reconstruct, stitch};
pub use search::{DirectionalSearch, Outcome};
