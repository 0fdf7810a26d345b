//! Component trait and implementations

use std::cell::Cell;

use crate::foundation::math::Transform;

/// Marker trait for components
///
/// Components are stored behind `Rc` and handed out shared, so any field a
/// controller needs to change belongs in a `Cell` or `RefCell`.
pub trait Component: 'static {}

/// World transform written by motion controllers
#[derive(Debug, Default)]
pub struct TransformComponent {
    transform: Cell<Transform>,
}

impl Component for TransformComponent {}

impl TransformComponent {
    /// Name the component is registered under
    pub const NAME: &'static str = "transform";

    /// Create a component holding `transform`
    pub fn new(transform: Transform) -> Self {
        Self {
            transform: Cell::new(transform),
        }
    }

    /// Current transform
    pub fn get(&self) -> Transform {
        self.transform.get()
    }

    /// Replace the transform
    pub fn set(&self, transform: Transform) {
        self.transform.set(transform);
    }
}
