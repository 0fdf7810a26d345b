//! Tile board
//!
//! The static grid parsed from an ASCII map, the behaviors attached to each
//! map character, and the manager that applies them as the body moves.

pub mod behavior;
pub mod cell_manager;
pub mod grid;

pub use behavior::{BehaviorTable, CellBehavior};
pub use cell_manager::{BoardController, CellManager};
pub use grid::{BoardLayout, MapFormatError, TileCoord, TileGrid};
