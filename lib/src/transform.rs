//! Computing the next generation.

use crate::{cells::CellPosition, world::World};
use std::collections::{HashMap, HashSet};

/// Computes successive generations of a [`World`] under the rule `B3/S23`.
///
/// For every living cell, it adds one to the neighbor count of each of its
/// in-bounds neighbors, then applies the rule to the counted cells.
/// Cells with no living neighbor are never visited, so the cost grows with
/// the population and not with the area of the board.
///
/// The count table is kept between calls and only cleared,
/// so a long-running board does not reallocate it every generation.
#[derive(Clone, Debug, Default)]
pub struct Transformer {
    /// Number of living neighbors of every cell touched in the last generation.
    counts: HashMap<CellPosition, u8>,
}

impl Transformer {
    /// Creates a new transformer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the generation after `world`.
    ///
    /// The result has the same size as `world` and its generation counter
    /// is one more.
    pub fn next(&mut self, world: &World) -> World {
        self.counts.clear();
        self.counts.reserve(world.population() * 4);

        for &pos in world.cells() {
            for nbr in world.neighbors(pos) {
                *self.counts.entry(nbr).or_insert(0) += 1;
            }
        }

        // Survivors. A living cell absent from the table has no living neighbor.
        let mut alive: HashSet<CellPosition> = world
            .cells()
            .iter()
            .copied()
            .filter(|pos| matches!(self.counts.get(pos), Some(2) | Some(3)))
            .collect();

        // Births.
        alive.extend(
            self.counts
                .iter()
                .filter(|&(pos, &count)| count == 3 && !world.is_alive(*pos))
                .map(|(&pos, _)| pos),
        );

        world.successor(alive)
    }

    /// The cells whose neighbor counts were accumulated by the last call to
    /// [`next`](Self::next), i.e. every cell next to a living cell.
    pub fn touched(&self) -> impl Iterator<Item = CellPosition> + '_ {
        self.counts.keys().copied()
    }

    /// Number of cells touched by the last generation.
    pub fn touched_count(&self) -> usize {
        self.counts.len()
    }
}
