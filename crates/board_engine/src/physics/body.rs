//! Player body state

use std::cell::RefCell;

use crate::config::PhysicsConfig;
use crate::ecs::Component;
use crate::foundation::math::{Transform, Vec3};

/// Moving circular body
///
/// Only the integrator and the collision resolver mutate it. `z` stays 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Center position in world space
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// External force for the next step, cleared on every move
    pub force: Vec3,
    /// Input impulsion, decays geometrically each tick
    pub impulsion: Vec3,
    /// Radius in world units
    pub radius: f32,
    /// Constant gravity
    pub gravity: Vec3,
}

impl Body {
    /// Component name the body is stored under
    pub const NAME: &'static str = "body";

    /// Body at rest
    pub fn new(position: Vec3, radius: f32, gravity: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            force: Vec3::zeros(),
            impulsion: Vec3::zeros(),
            radius,
            gravity,
        }
    }

    /// Body at rest using radius and gravity from `config`
    pub fn from_config(position: Vec3, config: &PhysicsConfig) -> Self {
        Self::new(position, config.radius, config.gravity)
    }

    /// Render transform: translated to the position, scaled by the radius
    pub fn transform(&self) -> Transform {
        Transform::from_position_scale(self.position, Vec3::new(self.radius, self.radius, 1.0))
    }
}

impl Component for RefCell<Body> {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_body_is_at_rest() {
        let body = Body::from_config(Vec3::new(20.0, 20.0, 0.0), &PhysicsConfig::default());
        assert_eq!(body.velocity, Vec3::zeros());
        assert_eq!(body.impulsion, Vec3::zeros());
        assert_relative_eq!(body.radius, 20.0);
        assert_relative_eq!(body.gravity.y, 500.0);
    }

    #[test]
    fn test_transform_scales_by_radius() {
        let body = Body::new(Vec3::new(3.0, 4.0, 0.0), 20.0, Vec3::zeros());
        let transform = body.transform();
        assert_eq!(transform.position, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(transform.scale, Vec3::new(20.0, 20.0, 1.0));
    }
}
