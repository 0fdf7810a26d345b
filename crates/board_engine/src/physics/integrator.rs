//! Ballistic integrator driven by `tick`

use std::cell::{Cell, RefCell};

use super::Body;
use crate::config::PhysicsConfig;
use crate::ecs::{Entity, TransformComponent, World};
use crate::events::{Channel, Controller, Event};
use crate::foundation::math::{Rect, Vec3};

/// Advance `body` by `delta` seconds and move it to the tentative position
///
/// Acceleration is gravity plus force plus impulsion. The displacement is
/// divided by `friction`. Returns `(old, new)` positions.
pub fn step(body: &mut Body, delta: f32, friction: f32) -> (Vec3, Vec3) {
    let acceleration = body.gravity + body.force + body.impulsion;
    body.velocity += acceleration * delta;
    let displacement = body.velocity * delta + acceleration * (0.5 * delta * delta);

    let old = body.position;
    let new = old + displacement / friction;
    body.position = new;
    (old, new)
}

/// Controller integrating the player body once per tick
///
/// Publishes `player-moved` after each step; listeners may correct the body
/// in place before the tick ends. Does nothing until `board-size` arrives.
pub struct PhysicsIntegrator {
    entity: Entity,
    friction: Cell<f32>,
    board: Cell<Option<Rect>>,
    impulsion_decay: f32,
}

impl PhysicsIntegrator {
    /// Integrator for the body stored on `entity`
    pub fn new(entity: Entity, config: &PhysicsConfig) -> Self {
        Self {
            entity,
            friction: Cell::new(1.0),
            board: Cell::new(None),
            impulsion_decay: config.impulsion_decay,
        }
    }

    /// Current friction factor
    pub fn friction(&self) -> f32 {
        self.friction.get()
    }

    /// Board rectangle, once known
    pub fn board(&self) -> Option<Rect> {
        self.board.get()
    }

    fn on_tick(&self, world: &World, delta: f32) {
        if self.board.get().is_none() {
            return;
        }
        let Some(body) = world.component::<RefCell<Body>>(self.entity, Body::NAME) else {
            log::warn!("Entity {} has no body to integrate", self.entity.id());
            return;
        };

        let (old, new) = step(&mut body.borrow_mut(), delta, self.friction.get());
        world.publish(&Event::player_moved(old, new));

        let mut body = body.borrow_mut();
        body.impulsion *= self.impulsion_decay;
        if let Some(transform) = world.component::<TransformComponent>(self.entity, TransformComponent::NAME) {
            transform.set(body.transform());
        }
    }
}

impl Controller for PhysicsIntegrator {
    fn channels(&self) -> &[Channel] {
        &[Channel::Tick, Channel::SetBoardFriction, Channel::BoardSize]
    }

    fn on_event(&self, world: &World, event: &Event, delta: f32) {
        match event.channel {
            Channel::Tick => self.on_tick(world, event.get_scalar("delta").unwrap_or(delta)),
            Channel::SetBoardFriction => match event.get_scalar("friction") {
                Some(friction) if friction > 0.0 => {
                    if (friction - self.friction.get()).abs() > f32::EPSILON {
                        log::debug!("Board friction set to {friction}");
                    }
                    self.friction.set(friction);
                }
                other => log::warn!("Ignoring invalid board friction {other:?}"),
            },
            Channel::BoardSize => self.board.set(event.get_rect("board_size")),
            _ => {}
        }
    }
}
