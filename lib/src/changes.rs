//! Tracking which cells changed.

use crate::{cells::CellPosition, world::World};
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The cells that were born and the cells that died in one operation.
///
/// Every change is listed, so a renderer only has to redraw these cells.
/// A cell never appears in both sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChangeSet {
    /// Cells that are alive now but were dead before.
    pub born: HashSet<CellPosition>,
    /// Cells that were alive before but are dead now.
    pub died: HashSet<CellPosition>,
}

impl ChangeSet {
    /// An empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The changes that turn `previous` into `next`.
    pub fn between(previous: &World, next: &World) -> Self {
        Self::between_cells(previous.cells(), next.cells())
    }

    pub(crate) fn between_cells(
        previous: &HashSet<CellPosition>,
        next: &HashSet<CellPosition>,
    ) -> Self {
        ChangeSet {
            born: next.difference(previous).copied().collect(),
            died: previous.difference(next).copied().collect(),
        }
    }

    /// A change set with a single birth.
    pub(crate) fn born(pos: CellPosition) -> Self {
        ChangeSet {
            born: HashSet::from([pos]),
            died: HashSet::new(),
        }
    }

    /// A change set with a single death.
    pub(crate) fn died(pos: CellPosition) -> Self {
        ChangeSet {
            born: HashSet::new(),
            died: HashSet::from([pos]),
        }
    }

    /// Whether nothing changed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.born.is_empty() && self.died.is_empty()
    }

    /// Total number of changed cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.born.len() + self.died.len()
    }

    /// Whether the cell changed in either direction.
    pub fn contains(&self, pos: CellPosition) -> bool {
        self.born.contains(&pos) || self.died.contains(&pos)
    }

    /// All changed cells with their new state, `true` for born.
    pub fn iter(&self) -> impl Iterator<Item = (CellPosition, bool)> + '_ {
        self.born
            .iter()
            .map(|&p| (p, true))
            .chain(self.died.iter().map(|&p| (p, false)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn between() -> Result<()> {
        let before = World::from_plaintext("oo.\n...\n", 2, 3)?;
        let after = World::from_plaintext(".oo\n...\n", 2, 3)?;
        let changes = ChangeSet::between(&before, &after);
        assert_eq!(changes.born, HashSet::from([CellPosition::new(0, 2)]));
        assert_eq!(changes.died, HashSet::from([CellPosition::new(0, 0)]));
        assert_eq!(changes.len(), 2);
        assert!(!changes.contains(CellPosition::new(0, 1)));
        assert!(ChangeSet::between(&after, &after).is_empty());
        Ok(())
    }

    #[test]
    fn iter() {
        let changes = ChangeSet::born(CellPosition::new(1, 1));
        assert_eq!(
            changes.iter().collect::<Vec<_>>(),
            vec![(CellPosition::new(1, 1), true)]
        );
        let changes = ChangeSet::died(CellPosition::new(0, 1));
        assert_eq!(
            changes.iter().collect::<Vec<_>>(),
            vec![(CellPosition::new(0, 1), false)]
        );
    }
}
