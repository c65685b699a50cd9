//! Cells on the board.

use std::fmt::{self, Debug, Formatter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The position of a cell.
///
/// `(row, column)`, both 0-indexed. Positions are plain values:
/// two positions are equal exactly when their coordinates are.
///
/// The derived ordering is row-major, which is also the order in which
/// cells are laid out in a save string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellPosition {
    /// The row.
    pub row: i32,
    /// The column.
    pub col: i32,
}

impl CellPosition {
    /// Creates a new position.
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        CellPosition { row, col }
    }

    /// Offsets the position by `(dr, dc)`, or `None` if that overflows.
    #[inline]
    pub(crate) fn checked_offset(self, (dr, dc): (i32, i32)) -> Option<Self> {
        Some(CellPosition::new(
            self.row.checked_add(dr)?,
            self.col.checked_add(dc)?,
        ))
    }
}

impl From<(i32, i32)> for CellPosition {
    #[inline]
    fn from((row, col): (i32, i32)) -> Self {
        CellPosition::new(row, col)
    }
}

impl Debug for CellPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The eight offsets of the Moore neighborhood.
pub(crate) const NBHD: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// An iterator over the in-bounds neighbors of a cell.
///
/// Returned by [`World::neighbors`](crate::World::neighbors).
/// It is cheap to clone, so the same neighborhood can be walked twice.
#[derive(Clone, Debug)]
pub struct Neighbors {
    center: CellPosition,
    rows: i32,
    columns: i32,
    index: usize,
}

impl Neighbors {
    #[inline]
    pub(crate) const fn new(center: CellPosition, rows: i32, columns: i32) -> Self {
        Neighbors {
            center,
            rows,
            columns,
            index: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = CellPosition;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while self.index < NBHD.len() {
            let offset = NBHD[self.index];
            self.index += 1;
            match self.center.checked_offset(offset) {
                Some(pos)
                    if 0 <= pos.row
                        && pos.row < self.rows
                        && 0 <= pos.col
                        && pos.col < self.columns =>
                {
                    return Some(pos)
                }
                _ => {}
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(NBHD.len() - self.index))
    }
}
