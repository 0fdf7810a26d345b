//! Body simulation
//!
//! Integration of the player body plus per-axis collision response against
//! solid board tiles.

pub mod body;
pub mod collision;
pub mod integrator;
pub mod power;

pub use body::Body;
pub use collision::{resolve_tile, Contact};
pub use integrator::{step, PhysicsIntegrator};
pub use power::PowerMove;
