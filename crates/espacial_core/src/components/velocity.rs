//! Linear and angular rate of change, consumed by the movement system.

use bytemuck::{Pod, Zeroable};
use espacial_shared::Vec2;

use crate::ecs::Component;

/// Below this speed an entity has no meaningful direction.
const MIN_DIRECTION_SPEED: f32 = 1e-4;

/// Linear (units/second) and angular (degrees/second) velocity.
///
/// Positive angular velocity rotates clockwise on screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// Linear velocity in units per second.
    pub linear: Vec2,
    /// Angular velocity in degrees per second.
    pub angular: f32,
}

impl Component for Velocity {
    const NAME: &'static str = "Velocity";
}

impl Velocity {
    /// Linear motion only.
    #[must_use]
    pub const fn new(linear: Vec2) -> Self {
        Self {
            linear,
            angular: 0.0,
        }
    }

    /// Linear and angular motion.
    #[must_use]
    pub const fn with(linear: Vec2, angular: f32) -> Self {
        Self { linear, angular }
    }

    /// Scalar speed (magnitude of the linear velocity).
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.linear.length()
    }

    /// Unit direction of travel, or zero when (nearly) stationary.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        let speed = self.speed();
        if speed > MIN_DIRECTION_SPEED {
            self.linear / speed
        } else {
            Vec2::ZERO
        }
    }
}
