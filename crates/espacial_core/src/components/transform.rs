//! Position, rotation and scale of an entity in 2D world space.

use bytemuck::{Pod, Zeroable};
use espacial_shared::Vec2;

use crate::ecs::Component;

/// Spatial pose of an entity.
///
/// Pure data. Rotation is in degrees and kept in `[0, 360)` by the movement
/// system; 0° points right, 90° down (screen coordinates, origin top-left).
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    /// Position in world coordinates.
    pub position: Vec2,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Scale (1.0 = original size).
    pub scale: Vec2,
}

impl Component for Transform {
    const NAME: &'static str = "Transform";
}

impl Transform {
    /// Transform at `position`, unrotated, unit scale.
    #[must_use]
    pub const fn new(position: Vec2) -> Self {
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
        }
    }

    /// Fully specified transform.
    #[must_use]
    pub const fn with(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// 3x3 affine matrix `T * R * S`, column-major (`m[column][row]`).
    ///
    /// This is the layout a 2D sprite shader consumes.
    #[must_use]
    pub fn matrix(&self) -> [[f32; 3]; 3] {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        [
            [cos * self.scale.x, sin * self.scale.x, 0.0],
            [-sin * self.scale.y, cos * self.scale.y, 0.0],
            [self.position.x, self.position.y, 1.0],
        ]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}
