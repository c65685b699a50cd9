//! Board configuration.

use crate::{
    board::Board,
    error::{Error, Result},
    history::DEFAULT_CAPACITY,
    world::check_size,
};
use educe::Educe;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Board configuration.
///
/// The board will be generated from this configuration.
#[derive(Clone, Debug, Educe, PartialEq)]
#[educe(Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Number of rows.
    #[educe(Default = 64)]
    pub rows: i32,

    /// Number of columns.
    #[educe(Default = 64)]
    pub columns: i32,

    /// How many earlier states can be restored by undo.
    #[educe(Default(expression = "DEFAULT_CAPACITY"))]
    pub history_capacity: usize,

    /// Probability that a cell is alive after
    /// [`randomize_default`](Board::randomize_default).
    #[educe(Default = 0.2)]
    pub density: f64,

    /// Seed of the random number generator.
    ///
    /// `None` means that the generator is seeded from the operating system,
    /// so every board randomizes differently.
    pub seed: Option<u64>,
}

impl Config {
    /// Sets up a new configuration with given size.
    pub fn new(rows: i32, columns: i32) -> Self {
        Config {
            rows,
            columns,
            ..Config::default()
        }
    }

    /// Sets the number of snapshots kept for undo.
    pub fn set_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    /// Sets the default density of [`randomize_default`](Board::randomize_default).
    pub fn set_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    /// Sets the seed of the random number generator.
    pub fn set_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Checks that the configuration describes a valid board.
    pub fn validate(&self) -> Result<()> {
        check_size(self.rows, self.columns)?;
        check_density(self.density)
    }

    /// Creates a new empty board from the configuration.
    pub fn board(&self) -> Result<Board> {
        Board::new(self.clone())
    }
}

/// Returns [`Error::InvalidDensity`] unless `0 <= density <= 1`.
pub(crate) fn check_density(density: f64) -> Result<()> {
    if (0.0..=1.0).contains(&density) {
        Ok(())
    } else {
        Err(Error::InvalidDensity(density))
    }
}
