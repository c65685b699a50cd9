//! A Game of Life engine on a bounded board.
//!
//! Only the living cells are stored, and the next generation is computed by
//! counting the neighbors of living cells, so large sparse boards stay cheap.
//! Every operation reports the cells it changed as a [`ChangeSet`],
//! can be undone through a bounded [`History`],
//! and the board can be saved as a short base64 string.
//!
//! ```rust
//! use lifegrid_lib::Config;
//!
//! let mut board = Config::new(5, 5).board().unwrap();
//! for col in 1..4 {
//!     board.set_cell(2, col, true).unwrap();
//! }
//!
//! let changes = board.step();
//! assert_eq!(changes.born.len(), 2);
//! assert_eq!(changes.died.len(), 2);
//!
//! let save = board.save();
//! board.undo();
//! board.restore(&save).unwrap();
//! assert!(board.is_alive(1, 2));
//! ```

mod board;
mod cells;
mod changes;
mod config;
mod error;
mod history;
pub mod save;
mod shared;
mod transform;
mod world;

pub use board::Board;
pub use cells::{CellPosition, Neighbors};
pub use changes::ChangeSet;
pub use config::Config;
pub use error::{Error, Result};
pub use history::{History, Snapshot, DEFAULT_CAPACITY};
pub use shared::SharedBoard;
pub use transform::Transformer;
pub use world::World;
