//! Per-axis collision response against solid tiles
//!
//! Discrete and post-integration: the body has already been moved to its
//! tentative position when a tile is resolved. The vertical pass runs first
//! and the horizontal pass sees whatever it changed.

use bitflags::bitflags;

use super::Body;
use crate::config::CollisionConfig;
use crate::foundation::math::{Rect, Vec3};

bitflags! {
    /// Which sides of a tile the body touched during one resolution
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Contact: u8 {
        /// Landed on the tile top
        const FLOOR = 1 << 0;
        /// Hit the tile bottom while rising
        const CEILING = 1 << 1;
        /// Hit the left or right side
        const WALL = 1 << 2;
        /// Vertical speed was low enough to come to rest
        const RESTING = 1 << 3;
    }
}

/// Resolve the body against one solid tile
///
/// `old` is the position before this step and only decides horizontal
/// approach direction. Returns the contacts that fired.
pub fn resolve_tile(body: &mut Body, old: &Vec3, tile: &Rect, config: &CollisionConfig) -> Contact {
    let mut contact = resolve_vertical(body, tile, config);
    contact |= resolve_horizontal(body, old, tile, config);
    contact
}

fn resolve_vertical(body: &mut Body, tile: &Rect, config: &CollisionConfig) -> Contact {
    if !tile.contains_x(body.position.x) {
        return Contact::empty();
    }

    let radius = body.radius;
    let y = body.position.y;
    if y + radius >= tile.y && y < tile.bottom() {
        let mut contact = Contact::FLOOR;
        if body.velocity.y > 0.0 {
            body.velocity.y *= -config.bounce_factor;
        }
        if body.velocity.y.abs() < config.rest_speed {
            // Cancel gravity on the next step so the body stays put
            body.force = -body.gravity;
            body.velocity.y = 0.0;
            body.velocity.x *= config.ground_damping;
            if body.velocity.x.abs() < config.rest_horizontal_speed {
                body.velocity.x = 0.0;
            }
            contact |= Contact::RESTING;
        }
        body.position.y = tile.y - radius;
        contact
    } else if y - radius <= tile.bottom() && y > tile.y {
        if body.velocity.y < 0.0 {
            body.velocity.y = -body.velocity.y;
        }
        body.position.y = tile.bottom() + radius;
        Contact::CEILING
    } else {
        Contact::empty()
    }
}

fn resolve_horizontal(body: &mut Body, old: &Vec3, tile: &Rect, config: &CollisionConfig) -> Contact {
    if !tile.contains_y(body.position.y) {
        return Contact::empty();
    }

    let radius = body.radius;
    let x = body.position.x;
    if x > old.x && x + radius >= tile.x && x < tile.right() {
        if body.velocity.x > 0.0 {
            body.velocity.x *= -config.wall_restitution;
        }
        body.position.x = tile.x - radius;
        Contact::WALL
    } else if x - radius <= tile.right() && x > tile.x {
        if body.velocity.x < 0.0 {
            body.velocity.x *= -config.wall_restitution;
        }
        body.position.x = tile.right() + radius;
        Contact::WALL
    } else {
        Contact::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const TILE: Rect = Rect::new(100.0, 100.0, 100.0, 100.0);

    fn body_at(x: f32, y: f32, velocity: Vec3) -> Body {
        let mut body = Body::new(Vec3::new(x, y, 0.0), 20.0, Vec3::new(0.0, 500.0, 0.0));
        body.velocity = velocity;
        body
    }

    #[test]
    fn test_slow_landing_comes_to_rest() {
        let mut body = body_at(150.0, 85.0, Vec3::new(40.0, 60.0, 0.0));
        let old = Vec3::new(150.0, 84.0, 0.0);
        let contact = resolve_tile(&mut body, &old, &TILE, &CollisionConfig::default());

        assert_eq!(contact, Contact::FLOOR | Contact::RESTING);
        assert_relative_eq!(body.position.y, 80.0);
        assert_relative_eq!(body.velocity.y, 0.0);
        assert_relative_eq!(body.velocity.x, 36.0);
        assert_eq!(body.force, -body.gravity);
    }

    #[test]
    fn test_fast_landing_bounces() {
        let mut body = body_at(150.0, 90.0, Vec3::new(0.0, 300.0, 0.0));
        let contact = resolve_tile(&mut body, &Vec3::new(150.0, 80.0, 0.0), &TILE, &CollisionConfig::default());

        assert_eq!(contact, Contact::FLOOR);
        assert_relative_eq!(body.velocity.y, -150.0);
        assert_relative_eq!(body.position.y, 80.0);
        assert_eq!(body.force, Vec3::zeros());
    }

    #[test]
    fn test_resting_slide_stops_below_threshold() {
        let mut body = body_at(150.0, 80.0, Vec3::new(4.0, 0.0, 0.0));
        resolve_tile(&mut body, &Vec3::new(149.9, 80.0, 0.0), &TILE, &CollisionConfig::default());
        assert_relative_eq!(body.velocity.x, 0.0);
    }

    #[test]
    fn test_ceiling_reflects_upward_motion() {
        let mut body = body_at(150.0, 215.0, Vec3::new(0.0, -200.0, 0.0));
        let contact = resolve_tile(&mut body, &Vec3::new(150.0, 220.0, 0.0), &TILE, &CollisionConfig::default());

        assert_eq!(contact, Contact::CEILING);
        assert_relative_eq!(body.velocity.y, 200.0);
        assert_relative_eq!(body.position.y, 220.0);
    }

    #[test]
    fn test_side_hit_from_the_left() {
        let mut body = body_at(85.0, 150.0, Vec3::new(100.0, 0.0, 0.0));
        let contact = resolve_tile(&mut body, &Vec3::new(80.0, 150.0, 0.0), &TILE, &CollisionConfig::default());

        assert_eq!(contact, Contact::WALL);
        assert_relative_eq!(body.velocity.x, -90.0);
        assert_relative_eq!(body.position.x, 80.0);
    }

    #[test]
    fn test_side_hit_from_the_right() {
        let mut body = body_at(215.0, 150.0, Vec3::new(-100.0, 0.0, 0.0));
        let contact = resolve_tile(&mut body, &Vec3::new(220.0, 150.0, 0.0), &TILE, &CollisionConfig::default());

        assert_eq!(contact, Contact::WALL);
        assert_relative_eq!(body.velocity.x, 90.0);
        assert_relative_eq!(body.position.x, 220.0);
    }

    #[test]
    fn test_neighbor_column_is_not_touched() {
        // Center is left of the tile and above its top row
        let mut body = body_at(90.0, 85.0, Vec3::new(0.0, 60.0, 0.0));
        let before = body.clone();
        let contact = resolve_tile(&mut body, &Vec3::new(90.0, 84.0, 0.0), &TILE, &CollisionConfig::default());
        assert!(contact.is_empty());
        assert_eq!(body, before);
    }
}
