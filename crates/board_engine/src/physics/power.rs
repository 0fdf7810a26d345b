//! Power-budget motion
//!
//! A reduced integrator: the body travels along a fixed direction while a
//! power budget lasts, bouncing off the board rectangle instead of tiles.

use std::cell::{Cell, RefCell};

use super::Body;
use crate::ecs::{Entity, TransformComponent, World};
use crate::events::{Channel, Controller, Event};
use crate::foundation::math::{Rect, Vec3};

/// Controller moving the body with a decreasing power budget
pub struct PowerMove {
    entity: Entity,
    power: Cell<f32>,
    direction: Cell<Vec3>,
    board: Rect,
    speed: f32,
    friction: Cell<f32>,
}

impl PowerMove {
    /// Start a move towards `direction`
    ///
    /// Returns `None` for a zero direction.
    pub fn new(entity: Entity, power: f32, direction: Vec3, board: Rect, speed: f32) -> Option<Self> {
        let direction = direction.try_normalize(f32::EPSILON)?;
        Some(Self {
            entity,
            power: Cell::new(power),
            direction: Cell::new(direction),
            board,
            speed,
            friction: Cell::new(1.0),
        })
    }

    /// Remaining power budget
    pub fn power(&self) -> f32 {
        self.power.get()
    }

    /// Current unit direction
    pub fn direction(&self) -> Vec3 {
        self.direction.get()
    }

    /// Whether the budget is spent
    pub fn is_exhausted(&self) -> bool {
        self.power.get() <= 1.0
    }

    fn next_position(&self, position: Vec3, delta: f32) -> Vec3 {
        position + self.direction.get() * (delta * self.power.get() * self.speed / self.friction.get())
    }

    /// Position after one tick, flipping the direction on each axis that
    /// would leave the board
    fn advance(&self, position: Vec3, delta: f32) -> Vec3 {
        let mut new = self.next_position(position, delta);
        if new.x < self.board.x || new.x >= self.board.right() {
            let mut direction = self.direction.get();
            direction.x = -direction.x;
            self.direction.set(direction);
            new = self.next_position(position, delta);
        }
        if new.y < self.board.y || new.y >= self.board.bottom() {
            let mut direction = self.direction.get();
            direction.y = -direction.y;
            self.direction.set(direction);
            new = self.next_position(position, delta);
        }
        new
    }

    fn on_tick(&self, world: &World, delta: f32) {
        if self.is_exhausted() {
            return;
        }
        let Some(body) = world.component::<RefCell<Body>>(self.entity, Body::NAME) else {
            return;
        };
        self.power.set(self.power.get() - 1.0);

        let old = body.borrow().position;
        let new = self.advance(old, delta);
        body.borrow_mut().position = new;
        world.publish(&Event::player_moved(old, new));

        if let Some(transform) = world.component::<TransformComponent>(self.entity, TransformComponent::NAME) {
            transform.set(body.borrow().transform());
        }
    }
}

impl Controller for PowerMove {
    fn channels(&self) -> &[Channel] {
        &[Channel::Tick, Channel::SetBoardFriction]
    }

    fn on_event(&self, world: &World, event: &Event, delta: f32) {
        match event.channel {
            Channel::Tick => self.on_tick(world, event.get_scalar("delta").unwrap_or(delta)),
            Channel::SetBoardFriction => {
                if let Some(friction) = event.get_scalar("friction").filter(|f| *f > 0.0) {
                    self.friction.set(friction);
                }
            }
            _ => {}
        }
    }
}
