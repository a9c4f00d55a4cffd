//! The [`PathFinder`] coordinator: validates a request, runs one or two
//! [`DirectionalSearch`]es over a grid and turns the winner into a route.

use std::thread;
use std::time::Instant;

use crossbeam_channel::{RecvTimeoutError, Sender};
use gridstar_core::{Direction, Grid, Point};
use log::{debug, warn};

use crate::config::{SearchConfig, SearchMode};
use crate::error::{Endpoint, SearchError};
use crate::route::{reconstruct, stitch};
use crate::search::{DirectionalSearch, Outcome};

/// Why a search produced the route it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// `Direction` popped its own target.
    Hit(Direction),
    /// `Direction` proved the cheapest junction between the two search
    /// trees shortest.
    Met(Direction),
    /// Start and end are not connected.
    NoPath,
    /// The dual search ran past its deadline and was cancelled.
    TimedOut,
    /// The grid was already solved, typically because it was not reset
    /// after the previous search.
    Preempted,
}

/// A route plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Start-to-end positions, each 8-adjacent to the next. Empty unless
    /// `termination` is `Hit` or `Met`.
    pub route: Vec<Point>,
    pub termination: Termination,
    /// Cells expanded by all directions together.
    pub expanded: usize,
}

impl SearchResult {
    fn empty(termination: Termination, expanded: usize) -> Self {
        Self {
            route: Vec::new(),
            termination,
            expanded,
        }
    }

    /// Whether a route was found.
    #[inline]
    pub fn is_found(&self) -> bool {
        !self.route.is_empty()
    }
}

/// What one direction reports back to the coordinator.
#[derive(Debug, Clone, Copy)]
struct Report {
    dir: Direction,
    outcome: Outcome,
    expanded: usize,
}

/// Shortest-route search over a [`Grid`].
///
/// A `PathFinder` holds no search state of its own and can be reused; the
/// grid cannot. Call [`Grid::reset`] between two searches on one grid.
#[derive(Debug, Clone, Default)]
pub struct PathFinder {
    config: SearchConfig,
}

impl PathFinder {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Route from `start` to `end`, or an empty route if none was found.
    ///
    /// Fails only if an endpoint is out of bounds or not traversable.
    pub fn find_path(
        &self,
        grid: &Grid,
        start: Point,
        end: Point,
    ) -> Result<Vec<Point>, SearchError> {
        Ok(self.search(grid, start, end)?.route)
    }

    /// Like [`find_path`](Self::find_path), also reporting how the search
    /// ended and how much work it did.
    pub fn search(
        &self,
        grid: &Grid,
        start: Point,
        end: Point,
    ) -> Result<SearchResult, SearchError> {
        validate(grid, start, Endpoint::Start)?;
        validate(grid, end, Endpoint::End)?;

        let result = match self.config.mode {
            SearchMode::Single => self.search_single(grid, start, end),
            SearchMode::Dual => self.search_dual(grid, start, end),
        };
        debug!(
            "{:?} search {} -> {}: {:?}, {} cells, {} expansions",
            self.config.mode,
            start,
            end,
            result.termination,
            result.route.len(),
            result.expanded
        );
        Ok(result)
    }

    fn search_single(&self, grid: &Grid, start: Point, end: Point) -> SearchResult {
        let mut search = DirectionalSearch::new(grid, start, end, Direction::Forward);
        let report = Report {
            dir: Direction::Forward,
            outcome: search.run(),
            expanded: search.expanded(),
        };
        conclude(grid, &[report])
    }

    fn search_dual(&self, grid: &Grid, start: Point, end: Point) -> SearchResult {
        let deadline = Instant::now() + self.config.timeout;
        let (tx, rx) = crossbeam_channel::bounded::<Report>(2);

        thread::scope(|s| {
            spawn_direction(s, grid, start, end, Direction::Forward, tx.clone());
            spawn_direction(s, grid, end, start, Direction::Backward, tx);

            let mut reports = Vec::with_capacity(2);
            let mut overtime = false;
            loop {
                let received = if overtime {
                    rx.recv().map_err(|_| RecvTimeoutError::Disconnected)
                } else {
                    rx.recv_deadline(deadline)
                };
                match received {
                    Ok(report) => {
                        let found = report.outcome.is_found();
                        reports.push(report);
                        if found {
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if grid.try_declare_solved() {
                            warn!(
                                "dual search {} -> {} timed out after {:?}",
                                start, end, self.config.timeout
                            );
                            // Workers see the flag and stop; the scope joins them.
                            let expanded = reports.iter().map(|r| r.expanded).sum();
                            return SearchResult::empty(Termination::TimedOut, expanded);
                        }
                        // A worker won the flag just now; its report is on the way.
                        overtime = true;
                    }
                    // Both workers have reported and dropped their senders.
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            conclude(grid, &reports)
        })
    }
}

fn spawn_direction<'scope, 'g: 'scope>(
    s: &'scope thread::Scope<'scope, '_>,
    grid: &'g Grid,
    origin: Point,
    target: Point,
    dir: Direction,
    tx: Sender<Report>,
) {
    s.spawn(move || {
        let mut search = DirectionalSearch::new(grid, origin, target, dir);
        let outcome = search.run();
        // The coordinator may have stopped listening after a timeout.
        let _ = tx.send(Report {
            dir,
            outcome,
            expanded: search.expanded(),
        });
    });
}

fn validate(grid: &Grid, pos: Point, endpoint: Endpoint) -> Result<(), SearchError> {
    let cell = grid.cell(pos).ok_or(SearchError::OutOfBounds {
        endpoint,
        pos,
        bounds: grid.bounds(),
    })?;
    if !cell.is_traversable() {
        return Err(SearchError::Blocked { endpoint, pos });
    }
    Ok(())
}

/// Turn the directions' reports into a result.
fn conclude(grid: &Grid, reports: &[Report]) -> SearchResult {
    let expanded = reports.iter().map(|r| r.expanded).sum();

    for report in reports {
        match report.outcome {
            Outcome::Hit(found) => {
                return SearchResult {
                    route: reconstruct(grid, found, report.dir),
                    termination: Termination::Hit(report.dir),
                    expanded,
                };
            }
            Outcome::Met(bridge) => {
                return SearchResult {
                    route: stitch(grid, bridge),
                    termination: Termination::Met(report.dir),
                    expanded,
                };
            }
            Outcome::Exhausted | Outcome::Preempted => {}
        }
    }

    if reports.iter().any(|r| r.outcome == Outcome::Exhausted) {
        SearchResult::empty(Termination::NoPath, expanded)
    } else {
        SearchResult::empty(Termination::Preempted, expanded)
    }
}
