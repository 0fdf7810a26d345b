//! # Board Engine
//!
//! Physics and collision core for a 2D side-view game: a circular body under
//! gravity and input impulses, deflected by a tile board loaded from ASCII.
//!
//! ## Features
//!
//! - **Tile Board**: ASCII maps with per-character behaviors (marks, friction
//!   zones, walls)
//! - **Physics**: fixed-tick integration plus per-axis tile collision response
//! - **Notification Bus**: synchronous named channels with re-entrant dispatch
//! - **Entity Host**: named entities carrying components and controllers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use board_engine::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! fn main() -> Result<(), MapFormatError> {
//!     let table = BehaviorTable::default();
//!     let layout = BoardLayout::default();
//!     let mut grid = TileGrid::parse("     \n#####", &table, &layout)?;
//!     let manager = CellManager::new(&mut grid, &table, CollisionConfig::default());
//!     let board_rect = grid.playfield();
//!
//!     let world = World::new();
//!     let player = world.create_entity("player");
//!     let body = Body::new(Vec3::new(100.0, 100.0, 0.0), 20.0, Vec3::new(0.0, 500.0, 0.0));
//!     let body = world
//!         .add_component(player, Body::NAME, RefCell::new(body))
//!         .expect("player exists");
//!     world.attach_controller(player, Rc::new(PhysicsIntegrator::new(player, &PhysicsConfig::default())));
//!     world.attach_controller(player, Rc::new(BoardController::new(manager, Rc::new(RefCell::new(grid)), body)));
//!
//!     world.publish(&Event::board_size(board_rect));
//!     for _ in 0..120 {
//!         world.tick(1.0 / 60.0);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod board;
pub mod config;
pub mod ecs;
pub mod events;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        board::{BehaviorTable, BoardController, BoardLayout, CellBehavior, CellManager, MapFormatError, TileCoord, TileGrid},
        config::{CollisionConfig, Config, ConfigError, PhysicsConfig},
        ecs::{Component, Entity, TransformComponent, World},
        events::{Channel, Controller, ControllerId, Direction, Event, EventArg, Notifier},
        foundation::{
            math::{Color, Rect, Transform, Vec2, Vec3},
            time::{FixedTimestep, Stopwatch},
        },
        physics::{Body, Contact, PhysicsIntegrator, PowerMove},
        spatial::overlapping_tiles,
    };
}
