//! Errors raised while building a [`Grid`](crate::Grid).

use crate::geom::Point;

/// Grid construction failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// Both dimensions must be at least [`Grid::MIN_SIDE`](crate::Grid::MIN_SIDE).
    #[error("grid must be at least 2x2, got {width}x{height}")]
    TooSmall { width: i32, height: i32 },

    /// The traversability buffer does not hold `width * height` entries.
    #[error("expected {expected} traversability entries, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A text grid has rows of different widths.
    #[error("row {row} is {actual} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A text grid contains something other than `#` or `.`.
    #[error("invalid grid character \u{201c}{ch}\u{201d} at {pos}")]
    InvalidChar { ch: char, pos: Point },
}
