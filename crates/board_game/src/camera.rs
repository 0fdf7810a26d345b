//! Camera easing towards the player

use std::cell::Cell;

use board_engine::ecs::World;
use board_engine::events::{Channel, Controller, Event};
use board_engine::foundation::math::Vec3;

use crate::config::CameraConfig;

/// Camera that trails the player on every move
pub struct FollowCamera {
    position: Cell<Vec3>,
    follow_rate: f32,
    dead_zone: f32,
}

impl FollowCamera {
    /// Camera starting at `position`
    pub fn new(position: Vec3, config: &CameraConfig) -> Self {
        Self {
            position: Cell::new(position),
            follow_rate: config.follow_rate,
            dead_zone: config.dead_zone,
        }
    }

    /// Current camera position
    pub fn position(&self) -> Vec3 {
        self.position.get()
    }
}

impl Controller for FollowCamera {
    fn channels(&self) -> &[Channel] {
        &[Channel::PlayerMoved]
    }

    fn on_event(&self, _world: &World, event: &Event, delta: f32) {
        let Some(target) = event.get_vector("new") else {
            return;
        };
        let offset = target - self.position.get();
        if offset.norm() > self.dead_zone {
            self.position.set(self.position.get() + offset * (delta * self.follow_rate));
        }
    }
}
