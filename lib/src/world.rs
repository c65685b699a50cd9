//! The world: live cells on a bounded board.

use crate::{
    cells::{CellPosition, Neighbors},
    error::{Error, Result},
};
use std::{
    collections::HashSet,
    fmt::{self, Display, Formatter},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The live cells of a bounded board.
///
/// Only living cells are stored; a dead cell is simply absent.
/// The size of the world is fixed when it is created.
/// Every stored position lies inside `[0, rows) × [0, columns)`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawWorld"))]
pub struct World {
    /// Number of rows.
    rows: i32,

    /// Number of columns.
    columns: i32,

    /// The living cells.
    alive: HashSet<CellPosition>,

    /// The number of generations stepped since the world was created,
    /// loaded or reset.
    generation: u64,
}

/// A deserialized world whose cells have not been checked yet.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawWorld {
    rows: i32,
    columns: i32,
    alive: HashSet<CellPosition>,
    generation: u64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawWorld> for World {
    type Error = Error;

    fn try_from(raw: RawWorld) -> Result<Self> {
        let mut world = World::from_cells(raw.rows, raw.columns, raw.alive)?;
        world.generation = raw.generation;
        Ok(world)
    }
}

/// The largest number of cells a board may have: its packed bits must fit
/// the 32-bit length prefix of a save.
pub(crate) const MAX_AREA: u64 = u32::MAX as u64 * 8;

/// Checks that a `rows` by `columns` board can exist.
pub(crate) fn check_size(rows: i32, columns: i32) -> Result<()> {
    if rows <= 0 || columns <= 0 {
        Err(Error::NonPositive)
    } else if rows as u64 * columns as u64 > MAX_AREA {
        Err(Error::TooLarge { rows, columns })
    } else {
        Ok(())
    }
}

impl World {
    /// Creates an empty world.
    ///
    /// Returns an error if either dimension is not positive,
    /// or if the board has more than `u32::MAX * 8` cells.
    pub fn new(rows: i32, columns: i32) -> Result<Self> {
        check_size(rows, columns)?;
        Ok(World {
            rows,
            columns,
            alive: HashSet::new(),
            generation: 0,
        })
    }

    /// Creates a world from an iterator of living cells.
    ///
    /// Fails on the first cell outside the board.
    pub fn from_cells(
        rows: i32,
        columns: i32,
        cells: impl IntoIterator<Item = CellPosition>,
    ) -> Result<Self> {
        let mut world = World::new(rows, columns)?;
        for pos in cells {
            world.check_bounds(pos)?;
            world.alive.insert(pos);
        }
        Ok(world)
    }

    /// Parses a world from a [Plaintext](https://conwaylife.com/wiki/Plaintext)
    /// pattern, anchored at the top-left corner.
    ///
    /// `o`, `O`, `#` and `*` are living cells; any other character is dead.
    /// Lines starting with `!` are comments.
    pub fn from_plaintext(text: &str, rows: i32, columns: i32) -> Result<Self> {
        let cells = text
            .lines()
            .filter(|line| !line.starts_with('!'))
            .enumerate()
            .flat_map(|(r, line)| {
                line.chars().enumerate().filter_map(move |(c, ch)| {
                    matches!(ch, 'o' | 'O' | '#' | '*')
                        .then(|| CellPosition::new(r as i32, c as i32))
                })
            });
        World::from_cells(rows, columns, cells)
    }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Total number of cells, `rows * columns`.
    #[inline]
    pub fn area(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// The generation counter.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Number of living cells.
    #[inline]
    pub fn population(&self) -> usize {
        self.alive.len()
    }

    /// Whether there are no living cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// The set of living cells.
    #[inline]
    pub fn cells(&self) -> &HashSet<CellPosition> {
        &self.alive
    }

    /// Whether a position lies on the board.
    #[inline]
    pub const fn contains(&self, pos: CellPosition) -> bool {
        0 <= pos.row && pos.row < self.rows && 0 <= pos.col && pos.col < self.columns
    }

    /// Returns [`Error::OutOfBounds`] if the position is off the board.
    pub fn check_bounds(&self, pos: CellPosition) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    /// Whether the cell is alive. Positions off the board are dead.
    #[inline]
    pub fn is_alive(&self, pos: CellPosition) -> bool {
        self.alive.contains(&pos)
    }

    /// The in-bounds cells around `pos`, at most eight of them.
    ///
    /// The board does not wrap around.
    #[inline]
    pub fn neighbors(&self, pos: CellPosition) -> Neighbors {
        Neighbors::new(pos, self.rows, self.columns)
    }

    /// Number of living neighbors of a cell.
    pub fn live_neighbor_count(&self, pos: CellPosition) -> usize {
        self.neighbors(pos).filter(|&n| self.is_alive(n)).count()
    }

    /// Makes a cell alive. Returns whether it was dead before.
    ///
    /// The position must already be checked.
    pub(crate) fn insert(&mut self, pos: CellPosition) -> bool {
        debug_assert!(self.contains(pos));
        self.alive.insert(pos)
    }

    /// Kills a cell. Returns whether it was alive before.
    pub(crate) fn remove(&mut self, pos: CellPosition) -> bool {
        self.alive.remove(&pos)
    }

    /// Replaces all living cells.
    pub(crate) fn replace_cells(&mut self, alive: HashSet<CellPosition>) -> HashSet<CellPosition> {
        std::mem::replace(&mut self.alive, alive)
    }

    /// The next generation of this world, with the given living cells.
    pub(crate) fn successor(&self, alive: HashSet<CellPosition>) -> Self {
        World {
            rows: self.rows,
            columns: self.columns,
            alive,
            generation: self.generation + 1,
        }
    }

    /// Living cells in row-major order.
    pub fn sorted_cells(&self) -> Vec<CellPosition> {
        let mut cells: Vec<_> = self.alive.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    /// Displays the whole world in
    /// [Plaintext](https://conwaylife.com/wiki/Plaintext) format.
    ///
    /// * **Dead** cells are represented by `.`;
    /// * **Living** cells are represented by `o`.
    pub fn plaintext(&self) -> String {
        self.to_string()
    }
}

impl Display for World {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.columns {
                let c = if self.is_alive(CellPosition::new(row, col)) {
                    'o'
                } else {
                    '.'
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_positive() {
        assert_eq!(World::new(0, 5), Err(Error::NonPositive));
        assert_eq!(World::new(5, -1), Err(Error::NonPositive));
    }

    #[test]
    fn too_large() {
        assert_eq!(
            World::new(i32::MAX, i32::MAX),
            Err(Error::TooLarge {
                rows: i32::MAX,
                columns: i32::MAX
            })
        );
        assert!(World::new(1 << 16, 1 << 16).is_ok());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn deserialized_cells_are_checked() -> std::result::Result<(), serde_json::Error> {
        let world: World = serde_json::from_str(
            r#"{"rows":2,"columns":3,"alive":[{"row":1,"col":2}],"generation":7}"#,
        )?;
        assert!(world.is_alive(CellPosition::new(1, 2)));
        assert_eq!(world.generation(), 7);

        for json in [
            r#"{"rows":2,"columns":2,"alive":[{"row":5,"col":0}],"generation":0}"#,
            r#"{"rows":2,"columns":2,"alive":[{"row":5,"col":-3}],"generation":0}"#,
            r#"{"rows":0,"columns":2,"alive":[],"generation":0}"#,
        ] {
            assert!(serde_json::from_str::<World>(json).is_err());
        }
        Ok(())
    }

    #[test]
    fn out_of_bounds_cells_are_rejected() {
        let err = World::from_cells(3, 3, [CellPosition::new(3, 0)]).unwrap_err();
        assert_eq!(
            err,
            Error::OutOfBounds {
                row: 3,
                col: 0,
                rows: 3,
                columns: 3
            }
        );
    }

    #[test]
    fn plaintext() -> Result<()> {
        let world = World::from_plaintext("!Name: Glider\n.o.\n..o\nooo\n", 4, 5)?;
        assert_eq!(world.population(), 5);
        assert!(world.is_alive(CellPosition::new(0, 1)));
        assert!(world.is_alive(CellPosition::new(2, 0)));
        assert_eq!(world.plaintext(), ".o...\n..o..\nooo..\n.....\n");
        assert_eq!(world.live_neighbor_count(CellPosition::new(1, 1)), 5);
        Ok(())
    }

    #[test]
    fn plaintext_too_large() {
        assert!(matches!(
            World::from_plaintext("ooo", 1, 2),
            Err(Error::OutOfBounds { col: 2, .. })
        ));
    }
}
