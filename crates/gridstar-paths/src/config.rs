//! Search configuration.

use std::time::Duration;

/// How many search directions a [`PathFinder`](crate::PathFinder) runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SearchMode {
    /// One forward search on the calling thread.
    #[default]
    Single,
    /// A forward and a backward search on two threads. They stop once the
    /// cheapest junction between them is proven, so routes are as short as
    /// in [`Single`](Self::Single) mode.
    Dual,
}

/// Settings for a [`PathFinder`](crate::PathFinder).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchConfig {
    pub mode: SearchMode,
    /// Upper bound on the wall time of a dual search. Single searches run
    /// to completion on the caller's thread and ignore it.
    pub timeout: Duration,
}

impl SearchConfig {
    /// Default wall-time bound for dual searches.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

    /// Dual-direction search with the default timeout.
    pub fn dual() -> Self {
        Self::default().with_mode(SearchMode::Dual)
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::Single,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}
