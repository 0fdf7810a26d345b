//! Power gauge charged while the pointer is held

use std::cell::Cell;
use std::rc::Rc;

use board_engine::ecs::{Component, Entity, TransformComponent, World};
use board_engine::events::{Channel, Controller, ControllerId, Event};
use board_engine::foundation::math::{Transform, Vec3};

use crate::config::PowerConfig;

/// Gauge level shared between the charge controllers and the game
#[derive(Debug)]
pub struct PowerGauge {
    level: Cell<f32>,
    config: PowerConfig,
}

impl Component for PowerGauge {}

impl PowerGauge {
    /// Component name the gauge is stored under
    pub const NAME: &'static str = "gauge";

    /// Gauge at its minimum level
    pub fn new(config: PowerConfig) -> Self {
        Self {
            level: Cell::new(config.min),
            config,
        }
    }

    /// Current level
    pub fn level(&self) -> f32 {
        self.level.get()
    }

    /// Grow the level, capped at the configured maximum
    pub fn refill(&self, delta: f32) {
        let level = delta.mul_add(self.config.refill_rate, self.level.get());
        self.level.set(level.min(self.config.max));
    }

    /// Drop back to the minimum level
    pub fn reset(&self) {
        self.level.set(self.config.min);
    }

    /// Bar transform: anchored at its bottom, height equal to the level
    pub fn transform(&self) -> Transform {
        let level = self.level();
        Transform::from_position_scale(Vec3::new(0.0, -level, 0.0), Vec3::new(1.0, level, 1.0))
    }
}

/// Grows the gauge once per tick while attached
struct Refill {
    entity: Entity,
    gauge: Rc<PowerGauge>,
}

impl Controller for Refill {
    fn channels(&self) -> &[Channel] {
        &[Channel::Tick]
    }

    fn on_event(&self, world: &World, event: &Event, delta: f32) {
        self.gauge.refill(event.get_scalar("delta").unwrap_or(delta));
        if let Some(transform) = world.component::<TransformComponent>(self.entity, TransformComponent::NAME) {
            transform.set(self.gauge.transform());
        }
    }
}

/// Attaches a refill controller on `start-power` and removes it on
/// `stop-power`
pub struct PowerController {
    entity: Entity,
    gauge: Rc<PowerGauge>,
    refill: Cell<Option<ControllerId>>,
}

impl PowerController {
    /// Controller for the gauge stored on `entity`
    pub fn new(entity: Entity, gauge: Rc<PowerGauge>) -> Self {
        Self {
            entity,
            gauge,
            refill: Cell::new(None),
        }
    }
}

impl Controller for PowerController {
    fn channels(&self) -> &[Channel] {
        &[Channel::StartPower, Channel::StopPower]
    }

    fn on_event(&self, world: &World, event: &Event, _delta: f32) {
        match event.channel {
            Channel::StartPower => {
                if self.refill.get().is_none() {
                    let refill = Rc::new(Refill {
                        entity: self.entity,
                        gauge: Rc::clone(&self.gauge),
                    });
                    self.refill.set(Some(world.attach_controller(self.entity, refill)));
                }
            }
            Channel::StopPower => {
                if let Some(id) = self.refill.take() {
                    world.detach_controller(id);
                }
                self.gauge.reset();
                if let Some(transform) = world.component::<TransformComponent>(self.entity, TransformComponent::NAME) {
                    transform.set(self.gauge.transform());
                }
            }
            _ => {}
        }
    }
}

/// Create the gauge entity with its component and controller
///
/// Returns `None` if the entity vanished before its components were added.
pub fn spawn_gauge(world: &World, config: PowerConfig) -> Option<(Entity, Rc<PowerGauge>)> {
    let entity = world.create_entity("power");
    let gauge = world.add_component(entity, PowerGauge::NAME, PowerGauge::new(config))?;
    world.add_component(entity, TransformComponent::NAME, TransformComponent::new(gauge.transform()))?;
    let controller = Rc::new(PowerController::new(entity, Rc::clone(&gauge)));
    world.attach_controller(entity, controller);
    Some((entity, gauge))
}
