//! Player spawn and `move-player` handling

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use board_engine::config::PhysicsConfig;
use board_engine::ecs::{Entity, TransformComponent, World};
use board_engine::events::{Channel, Controller, ControllerId, Event};
use board_engine::foundation::math::{Rect, Vec3};
use board_engine::physics::{Body, PhysicsIntegrator, PowerMove};

use crate::config::{MotionMode, PowerConfig};

/// Turns `move-player` commands into motion
///
/// Ballistic mode sets the body's impulsion. Power mode replaces the active
/// [`PowerMove`] controller, detaching the previous one first. Moves are
/// ignored until `board-size` has been received.
pub struct MovePlayer {
    entity: Entity,
    mode: MotionMode,
    impulse_scale: f32,
    power_speed: f32,
    key_power: f32,
    board: Cell<Option<Rect>>,
    motion: Cell<Option<ControllerId>>,
}

impl MovePlayer {
    /// Controller for the body stored on `entity`
    pub fn new(entity: Entity, mode: MotionMode, physics: &PhysicsConfig, power: &PowerConfig) -> Self {
        Self {
            entity,
            mode,
            impulse_scale: physics.impulse_scale,
            power_speed: physics.power_speed,
            key_power: power.key_power,
            board: Cell::new(None),
            motion: Cell::new(None),
        }
    }

    /// Active power-mode motion controller, if any
    pub fn active_motion(&self) -> Option<ControllerId> {
        self.motion.get()
    }

    fn on_move(&self, world: &World, event: &Event) {
        let Some(board) = self.board.get() else {
            log::debug!("move-player before board-size, ignored");
            return;
        };
        let Some(body) = world.component::<RefCell<Body>>(self.entity, Body::NAME) else {
            return;
        };

        let position = body.borrow().position;
        let (direction, power) = if let Some(direction) = event.get_direction("direction") {
            (direction.unit(), self.key_power)
        } else if let (Some(target), Some(power)) = (event.get_vector("pos"), event.get_scalar("power")) {
            (target - position, power)
        } else {
            log::warn!("move-player without a target or direction");
            return;
        };

        match self.mode {
            MotionMode::Ballistic => {
                if let Some(unit) = direction.try_normalize(f32::EPSILON) {
                    body.borrow_mut().impulsion = unit * (power * self.impulse_scale);
                }
            }
            MotionMode::Power => {
                if let Some(previous) = self.motion.take() {
                    world.detach_controller(previous);
                    log::debug!("Replaced active power move");
                }
                if let Some(motion) = PowerMove::new(self.entity, power, direction, board, self.power_speed) {
                    self.motion.set(Some(world.attach_controller(self.entity, Rc::new(motion))));
                }
            }
        }
    }
}

impl Controller for MovePlayer {
    fn channels(&self) -> &[Channel] {
        &[Channel::MovePlayer, Channel::BoardSize]
    }

    fn on_event(&self, world: &World, event: &Event, _delta: f32) {
        match event.channel {
            Channel::BoardSize => self.board.set(event.get_rect("board_size")),
            Channel::MovePlayer => self.on_move(world, event),
            _ => {}
        }
    }
}

/// Handles to the spawned player
pub struct Player {
    /// Player entity
    pub entity: Entity,
    /// Shared body state
    pub body: Rc<RefCell<Body>>,
    /// Command handler
    pub mover: Rc<MovePlayer>,
}

/// Create the player entity at `position`
///
/// Attaches the ballistic integrator unless the power motion model is used.
pub fn spawn_player(
    world: &World,
    position: Vec3,
    mode: MotionMode,
    physics: &PhysicsConfig,
    power: &PowerConfig,
) -> Option<Player> {
    let entity = world.create_entity("player");
    let body = Body::from_config(position, physics);
    let transform = TransformComponent::new(body.transform());
    let body = world.add_component(entity, Body::NAME, RefCell::new(body))?;
    world.add_component(entity, TransformComponent::NAME, transform)?;

    if mode == MotionMode::Ballistic {
        world.attach_controller(entity, Rc::new(PhysicsIntegrator::new(entity, physics)));
    }
    let mover = Rc::new(MovePlayer::new(entity, mode, physics, power));
    world.attach_controller(entity, mover.clone());
    log::info!("Spawned player at ({:.1}, {:.1}) in {mode:?} mode", position.x, position.y);

    Some(Player { entity, body, mover })
}
