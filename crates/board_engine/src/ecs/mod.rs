//! Entity-Component host
//!
//! Addressable entities carrying named components and the controllers
//! attached to them. Controllers are wired into the world's notification bus.

pub mod component;
pub mod entity;
pub mod world;

pub use component::{Component, TransformComponent};
pub use entity::Entity;
pub use world::World;
