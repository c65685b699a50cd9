//! Undo history.

use crate::{cells::CellPosition, world::World};
use std::collections::{HashSet, VecDeque};

/// The default number of snapshots kept by a [`History`].
pub const DEFAULT_CAPACITY: usize = 100;

/// A copy of the living cells of a world at some point.
///
/// It owns its cells, so later changes to the board cannot reach it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Number of rows of the world.
    pub rows: i32,
    /// Number of columns of the world.
    pub columns: i32,
    /// Generation counter of the world.
    pub generation: u64,
    /// The living cells.
    pub cells: HashSet<CellPosition>,
}

impl Snapshot {
    /// Takes a snapshot of a world.
    pub fn of(world: &World) -> Self {
        Snapshot {
            rows: world.rows(),
            columns: world.columns(),
            generation: world.generation(),
            cells: world.cells().clone(),
        }
    }
}

/// A bounded stack of [`Snapshot`]s.
///
/// Pushing past the capacity drops the oldest snapshot;
/// popping returns the newest one.
#[derive(Clone, Debug)]
pub struct History {
    /// Oldest first.
    entries: VecDeque<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        History::with_capacity(DEFAULT_CAPACITY)
    }
}

impl History {
    /// Creates an empty history that keeps at most `capacity` snapshots.
    ///
    /// A capacity of `0` keeps nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        History {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY) + 1),
            capacity,
        }
    }

    /// Maximal number of snapshots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of snapshots currently stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there is nothing to undo.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pushes a snapshot of `world`, evicting the oldest one when full.
    pub fn push(&mut self, world: &World) {
        self.push_snapshot(Snapshot::of(world));
    }

    /// Pushes a snapshot, evicting the oldest one when full.
    pub fn push_snapshot(&mut self, snapshot: Snapshot) {
        self.entries.push_back(snapshot);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Removes and returns the newest snapshot.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop_back()
    }

    /// The newest snapshot, without removing it.
    pub fn peek(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
