//! Math utilities and types
//!
//! Provides the vector, color and rectangle types used by the board and the
//! physics core. Positions are 3D with `z` pinned to zero so they can be written
//! straight into a transform.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// RGB color with components in `[0, 1]`
pub type Color = Vector3<f32>;

/// Build a color from a `0xRRGGBB` literal
pub fn rgb(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    Color::new(channel(16), channel(8), channel(0))
}

/// Named colors used by the board
pub mod colors {
    use super::{rgb, Color};

    /// Resting color of an empty ground tile
    pub fn ground() -> Color {
        rgb(0x35_67_12)
    }

    /// Checkpoint marker
    pub fn red() -> Color {
        Color::new(1.0, 0.0, 0.0)
    }

    /// Wall tiles
    pub fn white() -> Color {
        Color::new(1.0, 1.0, 1.0)
    }

    /// Friction zones
    pub fn friction_blue() -> Color {
        rgb(0x23_42_ff)
    }

    /// Highlight for walls the body is pressing against
    pub fn contact() -> Color {
        rgb(0x80_00_80)
    }
}

/// Axis-aligned rectangle, `y` grows downward like screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and extent
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Whether `x` lies in `[left, right)`
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x && x < self.right()
    }

    /// Whether `y` lies in `[top, bottom)`
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.y && y < self.bottom()
    }

    /// Whether the point lies inside the half-open rectangle
    pub fn contains(&self, point: &Vec3) -> bool {
        self.contains_x(point.x) && self.contains_y(point.y)
    }
}

/// Transform representing position and scale
///
/// Bodies on the board never rotate, so only translation and scale are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and scale
    pub fn from_position_scale(position: Vec3, scale: Vec3) -> Self {
        Self { position, scale }
    }
}
