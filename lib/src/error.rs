//! All kinds of errors in this crate.

use displaydoc::Display;
use thiserror::Error;

/// All kinds of errors in this crate.
#[derive(Clone, Debug, PartialEq, Display, Error)]
pub enum Error {
    /// Cell ({row}, {col}) is outside the {rows}x{columns} board.
    OutOfBounds {
        /// Row of the rejected cell.
        row: i32,
        /// Column of the rejected cell.
        col: i32,
        /// Number of rows of the board.
        rows: i32,
        /// Number of columns of the board.
        columns: i32,
    },
    /// Saved board has {found} cells, but the target board has {expected}.
    SizeMismatch {
        /// `rows * columns` of the target board.
        expected: usize,
        /// Number of cells found in the save.
        found: usize,
    },
    /// Unable to decode the save: {0}.
    Decode(String),
    /// Density should be between 0 and 1, got {0}.
    InvalidDensity(f64),
    /// Rows / columns should be positive.
    NonPositive,
    /// A {rows}x{columns} board has too many cells to be saved.
    TooLarge {
        /// Number of rows.
        rows: i32,
        /// Number of columns.
        columns: i32,
    },
    /// The board lock was poisoned by a panicking thread.
    Poisoned,
}

/// A specialized [`Result`](std::result::Result) for this crate.
pub type Result<T> = std::result::Result<T, Error>;
