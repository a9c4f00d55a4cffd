//! Errors returned by [`PathFinder`](crate::PathFinder).
//!
//! Only invalid requests are errors. "No route exists" and "the search
//! timed out" are ordinary outcomes reported as an empty route.

use std::fmt;

use gridstar_core::{Point, Range};

/// Which end of a request an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Invalid search input, rejected before any search state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("{endpoint} {pos} is outside the grid {bounds}")]
    OutOfBounds {
        endpoint: Endpoint,
        pos: Point,
        bounds: Range,
    },

    #[error("{endpoint} {pos} is not traversable")]
    Blocked { endpoint: Endpoint, pos: Point },
}

impl SearchError {
    /// The offending endpoint.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::OutOfBounds { endpoint, .. } | Self::Blocked { endpoint, .. } => *endpoint,
        }
    }
}
