//! # Board Game
//!
//! Side-view tile board game on top of `board_engine`: configuration,
//! player spawn and input handling, the power gauge, the follow camera and a
//! headless fixed-tick loop.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod camera;
pub mod config;
pub mod game;
pub mod player;
pub mod power;
pub mod script;

pub use config::{GameConfig, MotionMode};
pub use game::{Game, GameError};
pub use script::{Action, Script};
