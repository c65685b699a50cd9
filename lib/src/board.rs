//! The board: a world together with its undo history and last changes.

use crate::{
    cells::CellPosition,
    changes::ChangeSet,
    config::{check_density, Config},
    error::Result,
    history::{History, Snapshot},
    save,
    transform::Transformer,
    world::World,
};
use log::{debug, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;

/// A Game of Life board.
///
/// Every operation that changes the living cells first pushes a snapshot to
/// the undo history (except [`undo`](Self::undo) itself), then applies the
/// change, then publishes the born and died cells as a [`ChangeSet`].
/// The change set is replaced, not accumulated, by the next operation.
///
/// The board has no notion of running or pausing;
/// a driver calls [`step`](Self::step) whenever it wants a new generation.
#[derive(Debug)]
pub struct Board {
    /// Board configuration.
    config: Config,

    /// The living cells.
    world: World,

    /// Snapshots of earlier worlds.
    history: History,

    /// Computes the next generation.
    transformer: Transformer,

    /// Changes made by the last operation.
    changes: ChangeSet,

    /// Used by [`randomize`](Self::randomize).
    rng: StdRng,
}

impl Board {
    /// Creates an empty board from the configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let world = World::new(config.rows, config.columns)?;
        Ok(Board::with_world(config, world))
    }

    /// Creates a board from a world. The size in `config` is overridden by
    /// the size of `world`.
    pub fn from_world(mut config: Config, world: World) -> Result<Self> {
        config.rows = world.rows();
        config.columns = world.columns();
        config.validate()?;
        Ok(Board::with_world(config, world))
    }

    /// Creates a board from a string produced by [`save`](Self::save),
    /// with the size given by `config`.
    ///
    /// The new board has an empty history.
    pub fn load(text: &str, config: Config) -> Result<Self> {
        config.validate()?;
        let world = save::load(text, config.rows, config.columns)?;
        Ok(Board::with_world(config, world))
    }

    fn with_world(config: Config, world: World) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Board {
            history: History::with_capacity(config.history_capacity),
            transformer: Transformer::new(),
            changes: ChangeSet::new(),
            config,
            world,
            rng,
        }
    }

    /// Board configuration.
    #[inline]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The current world.
    #[inline]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Number of rows.
    #[inline]
    pub const fn rows(&self) -> i32 {
        self.world.rows()
    }

    /// Number of columns.
    #[inline]
    pub const fn columns(&self) -> i32 {
        self.world.columns()
    }

    /// The generation counter.
    #[inline]
    pub const fn generation(&self) -> u64 {
        self.world.generation()
    }

    /// Number of living cells.
    #[inline]
    pub fn population(&self) -> usize {
        self.world.population()
    }

    /// Whether the cell at `(row, col)` is alive.
    #[inline]
    pub fn is_alive(&self, row: i32, col: i32) -> bool {
        self.world.is_alive(CellPosition::new(row, col))
    }

    /// The undo history.
    #[inline]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// The cells touched while computing the last generation.
    #[inline]
    pub const fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Changes made by the last operation.
    #[inline]
    pub const fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// Takes the changes made by the last operation,
    /// leaving an empty change set behind.
    pub fn take_changes(&mut self) -> ChangeSet {
        std::mem::take(&mut self.changes)
    }

    /// Pushes the current world to the history.
    fn snapshot(&mut self) {
        self.history.push(&self.world);
    }

    /// Replaces the living cells and publishes the difference.
    fn replace_cells(&mut self, alive: HashSet<CellPosition>) -> &ChangeSet {
        self.changes = ChangeSet::between_cells(self.world.cells(), &alive);
        self.world.replace_cells(alive);
        &self.changes
    }

    /// Advances the board by one generation.
    pub fn step(&mut self) -> &ChangeSet {
        self.snapshot();
        let next = self.transformer.next(&self.world);
        self.changes = ChangeSet::between(&self.world, &next);
        self.world = next;
        debug!(
            "generation {}: population {}, {} born, {} died, {} cells touched",
            self.world.generation(),
            self.world.population(),
            self.changes.born.len(),
            self.changes.died.len(),
            self.transformer.touched_count()
        );
        &self.changes
    }

    /// Makes the cell at `(row, col)` alive or dead.
    ///
    /// If the cell is already in the requested state, nothing happens:
    /// no snapshot is pushed and the published change set is empty,
    /// so repeated calls do not use up the undo history.
    pub fn set_cell(&mut self, row: i32, col: i32, alive: bool) -> Result<&ChangeSet> {
        let pos = CellPosition::new(row, col);
        self.world.check_bounds(pos)?;
        if self.world.is_alive(pos) == alive {
            trace!("cell {:?} is already {}", pos, if alive { "alive" } else { "dead" });
            self.changes = ChangeSet::new();
            return Ok(&self.changes);
        }
        Ok(self.flip(pos))
    }

    /// Flips the cell at `(row, col)`.
    pub fn toggle_cell(&mut self, row: i32, col: i32) -> Result<&ChangeSet> {
        let pos = CellPosition::new(row, col);
        self.world.check_bounds(pos)?;
        Ok(self.flip(pos))
    }

    /// Flips a cell that is known to be on the board.
    fn flip(&mut self, pos: CellPosition) -> &ChangeSet {
        self.snapshot();
        self.changes = if self.world.remove(pos) {
            ChangeSet::died(pos)
        } else {
            self.world.insert(pos);
            ChangeSet::born(pos)
        };
        trace!("flipped cell {:?}", pos);
        &self.changes
    }

    /// Kills every cell and sets the generation counter back to 0.
    pub fn reset(&mut self) -> &ChangeSet {
        self.snapshot();
        self.world.set_generation(0);
        debug!("reset, {} cells died", self.world.population());
        self.replace_cells(HashSet::new())
    }

    /// Makes each cell alive independently with probability `density`.
    ///
    /// Returns [`Error::InvalidDensity`](crate::Error::InvalidDensity)
    /// unless `0 <= density <= 1`; the board is not touched in that case.
    pub fn randomize(&mut self, density: f64) -> Result<&ChangeSet> {
        check_density(density)?;
        self.snapshot();
        let (rows, columns) = (self.rows(), self.columns());
        let rng = &mut self.rng;
        let alive: HashSet<_> = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| CellPosition::new(row, col)))
            .filter(|_| rng.gen_bool(density))
            .collect();
        debug!("randomized with density {}: population {}", density, alive.len());
        Ok(self.replace_cells(alive))
    }

    /// [`randomize`](Self::randomize) with the density from the configuration.
    pub fn randomize_default(&mut self) -> Result<&ChangeSet> {
        self.randomize(self.config.density)
    }

    /// Restores the world before the last operation.
    ///
    /// Returns `None` if there is nothing to undo; the board is unchanged
    /// then. Undo itself is never recorded in the history.
    pub fn undo(&mut self) -> Option<&ChangeSet> {
        let Snapshot {
            generation, cells, ..
        } = self.history.pop()?;
        self.world.set_generation(generation);
        debug!(
            "undo to generation {}, {} snapshots left",
            generation,
            self.history.len()
        );
        Some(self.replace_cells(cells))
    }

    /// Forgets the undo history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Saves the living cells as a string that can be passed to
    /// [`load`](Self::load) or [`restore`](Self::restore).
    pub fn save(&self) -> String {
        save::save(&self.world)
    }

    /// Replaces the living cells by those of a saved board of the same size.
    ///
    /// This is recorded in the history like any other edit.
    /// On error the board is left exactly as it was.
    pub fn restore(&mut self, text: &str) -> Result<&ChangeSet> {
        let loaded = save::load(text, self.rows(), self.columns())?;
        self.snapshot();
        self.world.set_generation(0);
        let alive = loaded.cells().clone();
        debug!("restored a saved board: population {}", alive.len());
        Ok(self.replace_cells(alive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn new_board(rows: i32, columns: i32) -> Board {
        Config::new(rows, columns)
            .set_seed(Some(0))
            .board()
            .unwrap()
    }

    #[test]
    fn set_cell_same_state_does_not_push() -> Result<()> {
        let mut board = new_board(4, 4);
        assert_eq!(board.set_cell(1, 1, true)?.born.len(), 1);
        assert_eq!(board.history().len(), 1);
        assert!(board.set_cell(1, 1, true)?.is_empty());
        assert!(board.set_cell(2, 2, false)?.is_empty());
        assert_eq!(board.history().len(), 1);
        assert!(board.set_cell(1, 1, false)?.died.contains(&CellPosition::new(1, 1)));
        assert_eq!(board.history().len(), 2);
        Ok(())
    }

    #[test]
    fn out_of_bounds() {
        let mut board = new_board(3, 5);
        for (row, col) in [(-1, 0), (0, -1), (3, 0), (0, 5)] {
            assert!(matches!(
                board.toggle_cell(row, col),
                Err(Error::OutOfBounds { .. })
            ));
            assert!(board.set_cell(row, col, true).is_err());
        }
        assert!(board.world().is_empty());
        assert!(board.history().is_empty());
    }

    #[test]
    fn toggle() -> Result<()> {
        let mut board = new_board(3, 3);
        assert_eq!(
            board.toggle_cell(0, 2)?.born,
            HashSet::from([CellPosition::new(0, 2)])
        );
        assert!(board.is_alive(0, 2));
        assert_eq!(
            board.toggle_cell(0, 2)?.died,
            HashSet::from([CellPosition::new(0, 2)])
        );
        assert!(!board.is_alive(0, 2));
        Ok(())
    }

    #[test]
    fn reset() -> Result<()> {
        let mut board = new_board(3, 3);
        board.toggle_cell(0, 0)?;
        board.toggle_cell(2, 2)?;
        board.step();
        board.toggle_cell(0, 1)?;
        board.toggle_cell(1, 1)?;
        let changes = board.reset();
        assert!(changes.born.is_empty());
        assert_eq!(
            changes.died,
            HashSet::from([CellPosition::new(0, 1), CellPosition::new(1, 1)])
        );
        assert_eq!(board.generation(), 0);
        assert!(board.world().is_empty());
        Ok(())
    }

    #[test]
    fn randomize() -> Result<()> {
        let mut board = new_board(20, 30);
        assert!(board.randomize(0.0)?.is_empty());
        assert_eq!(board.randomize(1.0)?.born.len(), 600);
        assert!(matches!(board.randomize(-0.1), Err(Error::InvalidDensity(_))));
        assert_eq!(board.history().len(), 2);
        let changes = board.randomize_default()?;
        assert!(!changes.died.is_empty());
        assert!(changes.born.is_empty());
        let population = board.population();
        assert!(population > 0 && population < 600);
        Ok(())
    }

    #[test]
    fn take_changes() -> Result<()> {
        let mut board = new_board(3, 3);
        board.toggle_cell(1, 1)?;
        assert_eq!(board.take_changes().len(), 1);
        assert!(board.changes().is_empty());
        Ok(())
    }

    #[test]
    fn undo_restores_generation() -> Result<()> {
        let mut board = new_board(5, 5);
        board.toggle_cell(2, 1)?;
        board.toggle_cell(2, 2)?;
        board.toggle_cell(2, 3)?;
        board.step();
        board.step();
        assert_eq!(board.generation(), 2);
        board.undo();
        assert_eq!(board.generation(), 1);
        Ok(())
    }

    #[test]
    fn restore_keeps_board_on_error() -> Result<()> {
        let mut board = new_board(4, 4);
        board.toggle_cell(1, 1)?;
        let before = board.world().clone();
        assert!(board.restore("garbage").is_err());
        assert!(board.restore(&save::save(&World::new(8, 8)?)).is_err());
        assert_eq!(board.world(), &before);
        assert_eq!(board.history().len(), 1);

        let mut other = new_board(4, 4);
        other.toggle_cell(3, 3)?;
        let changes = board.restore(&other.save())?.clone();
        assert_eq!(changes.born, HashSet::from([CellPosition::new(3, 3)]));
        assert_eq!(changes.died, HashSet::from([CellPosition::new(1, 1)]));
        assert_eq!(board.undo().map(|c| c.len()), Some(2));
        assert_eq!(board.world(), &before);
        Ok(())
    }
}
