//! A board shared between a ticking driver, editors and renderers.

use crate::{
    board::Board,
    changes::ChangeSet,
    error::{Error, Result},
    world::World,
};
use log::debug;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// A cloneable handle to a [`Board`] behind a mutex.
///
/// Only one operation runs on the board at a time. [`tick`](Self::tick)
/// never waits: if the board is busy the tick is dropped, so a slow
/// generation cannot build up a backlog of pending ones. All other
/// operations wait for their turn.
///
/// Each method returns an owned copy of its change set, taken before the
/// lock is released.
#[derive(Clone, Debug)]
pub struct SharedBoard {
    inner: Arc<Mutex<Board>>,
}

impl From<Board> for SharedBoard {
    fn from(board: Board) -> Self {
        SharedBoard::new(board)
    }
}

impl SharedBoard {
    /// Wraps a board.
    pub fn new(board: Board) -> Self {
        SharedBoard {
            inner: Arc::new(Mutex::new(board)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Board>> {
        self.inner.lock().map_err(|_| Error::Poisoned)
    }

    /// Runs `f` with exclusive access to the board.
    pub fn with<T>(&self, f: impl FnOnce(&mut Board) -> T) -> Result<T> {
        let mut board = self.lock()?;
        Ok(f(&mut *board))
    }

    /// Runs `f` if the board is free, or returns `Ok(None)` without waiting.
    fn try_with<T>(&self, f: impl FnOnce(&mut Board) -> T) -> Result<Option<T>> {
        match self.inner.try_lock() {
            Ok(mut board) => Ok(Some(f(&mut *board))),
            Err(TryLockError::WouldBlock) => {
                debug!("board busy, tick dropped");
                Ok(None)
            }
            Err(TryLockError::Poisoned(_)) => Err(Error::Poisoned),
        }
    }

    /// Advances the board by one generation, unless another operation is
    /// running, in which case the tick is dropped and `Ok(None)` is returned.
    pub fn tick(&self) -> Result<Option<ChangeSet>> {
        self.try_with(|board| board.step().clone())
    }

    /// Like [`tick`](Self::tick), but also returns a copy of the generation
    /// the tick produced.
    ///
    /// The copy is taken under the same lock as the step, so it belongs to
    /// this tick even if more ticks follow before the caller looks at it.
    pub fn tick_view(&self) -> Result<Option<(World, ChangeSet)>> {
        self.try_with(|board| {
            let changes = board.step().clone();
            (board.world().clone(), changes)
        })
    }

    /// Advances the board by one generation, waiting for the lock.
    pub fn step(&self) -> Result<ChangeSet> {
        self.with(|board| board.step().clone())
    }

    /// See [`Board::set_cell`].
    pub fn set_cell(&self, row: i32, col: i32, alive: bool) -> Result<ChangeSet> {
        self.with(|board| board.set_cell(row, col, alive).cloned())?
    }

    /// See [`Board::toggle_cell`].
    pub fn toggle_cell(&self, row: i32, col: i32) -> Result<ChangeSet> {
        self.with(|board| board.toggle_cell(row, col).cloned())?
    }

    /// See [`Board::undo`]. `Ok(None)` means there is nothing to undo.
    pub fn undo(&self) -> Result<Option<ChangeSet>> {
        self.with(|board| board.undo().cloned())
    }

    /// See [`Board::reset`].
    pub fn reset(&self) -> Result<ChangeSet> {
        self.with(|board| board.reset().clone())
    }

    /// See [`Board::randomize`].
    pub fn randomize(&self, density: f64) -> Result<ChangeSet> {
        self.with(|board| board.randomize(density).cloned())?
    }

    /// See [`Board::restore`].
    pub fn restore(&self, text: &str) -> Result<ChangeSet> {
        self.with(|board| board.restore(text).cloned())?
    }

    /// See [`Board::save`].
    pub fn save(&self) -> Result<String> {
        self.with(|board| board.save())
    }

    /// A consistent copy of the current world and the last published changes.
    ///
    /// Both are read under the same lock, so they always belong to the same
    /// completed operation.
    pub fn view(&self) -> Result<(World, ChangeSet)> {
        self.with(|board| (board.world().clone(), board.changes().clone()))
    }

    /// Like [`view`](Self::view), but drains the published changes, so the
    /// next call only reports what happened since.
    pub fn take_view(&self) -> Result<(World, ChangeSet)> {
        self.with(|board| (board.world().clone(), board.take_changes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::{sync::mpsc, thread};

    fn blinker() -> Result<SharedBoard> {
        let mut board = Config::new(5, 5).board()?;
        for col in 1..4 {
            board.set_cell(2, col, true)?;
        }
        Ok(board.into())
    }

    #[test]
    fn tick_is_dropped_while_busy() -> Result<()> {
        let shared = blinker()?;
        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let holder = {
            let shared = shared.clone();
            thread::spawn(move || {
                shared.with(|_| {
                    locked_tx.send(()).ok();
                    release_rx.recv().ok();
                })
            })
        };

        locked_rx.recv().ok();
        assert_eq!(shared.tick()?, None);
        release_tx.send(()).ok();
        holder.join().map_err(|_| Error::Poisoned)??;

        assert!(shared.tick()?.is_some());
        let (world, _) = shared.view()?;
        assert_eq!(world.generation(), 1);
        Ok(())
    }

    #[test]
    fn tick_views_are_not_shared() -> Result<()> {
        let shared = blinker()?;
        let (first_world, first_changes) = shared.tick_view()?.expect("board is free");
        let (second_world, second_changes) = shared.tick_view()?.expect("board is free");
        assert_eq!(first_world.generation(), 1);
        assert_eq!(second_world.generation(), 2);
        assert_eq!(first_changes.born, second_changes.died);
        assert_eq!(first_changes.died, second_changes.born);
        assert!(first_world.is_alive(crate::CellPosition::new(1, 2)));
        assert!(second_world.is_alive(crate::CellPosition::new(2, 1)));
        Ok(())
    }

    #[test]
    fn concurrent_edits_are_serialized() -> Result<()> {
        let shared = SharedBoard::new(Config::new(8, 8).board()?);
        let handles: Vec<_> = (0..8)
            .map(|row| {
                let shared = shared.clone();
                thread::spawn(move || -> Result<()> {
                    for col in 0..8 {
                        shared.toggle_cell(row, col)?;
                    }
                    Ok(())
                })
            })
            .collect();
        for handle in handles {
            handle.join().map_err(|_| Error::Poisoned)??;
        }
        let (world, changes) = shared.take_view()?;
        assert_eq!(world.population(), 64);
        assert_eq!(changes.len(), 1);
        assert!(shared.view()?.1.is_empty());
        assert_eq!(shared.with(|board| board.history().len())?, 64);
        Ok(())
    }

    #[test]
    fn poisoned() -> Result<()> {
        let shared = blinker()?;
        let clone = shared.clone();
        let _ = thread::spawn(move || {
            clone.with::<()>(|_| panic!("boom")).ok();
        })
        .join();
        assert_eq!(shared.tick(), Err(Error::Poisoned));
        assert_eq!(shared.step(), Err(Error::Poisoned));
        Ok(())
    }

    #[test]
    fn delegates() -> Result<()> {
        let shared = blinker()?;
        assert_eq!(shared.step()?.len(), 4);
        assert_eq!(shared.undo()?.map(|c| c.len()), Some(4));
        let text = shared.save()?;
        assert_eq!(shared.reset()?.died.len(), 3);
        assert_eq!(shared.restore(&text)?.born.len(), 3);
        assert!(matches!(
            shared.set_cell(5, 0, true),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(shared.randomize(2.0).is_err());
        Ok(())
    }
}
