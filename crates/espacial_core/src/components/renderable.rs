//! Marks an entity as drawable and carries what the render pass needs.

use espacial_shared::Color;

use crate::ecs::Component;

/// Sprite description read by the render pass.
///
/// Higher layers draw on top. Suggested bands: 0-9 background, 10-19
/// players, 20-29 projectiles, 30-39 particles, 40+ UI.
#[derive(Clone, Debug, PartialEq)]
pub struct Renderable {
    /// Texture identifier known to the renderer.
    pub texture_id: String,
    /// RGBA tint; white leaves the texture unchanged.
    pub color: Color,
    /// Draw order, ascending.
    pub layer: i32,
    /// Hidden sprites are skipped by the render pass.
    pub visible: bool,
}

impl Component for Renderable {
    const NAME: &'static str = "Renderable";
}

impl Renderable {
    /// Untinted sprite on layer 0.
    #[must_use]
    pub fn new(texture_id: impl Into<String>) -> Self {
        Self {
            texture_id: texture_id.into(),
            ..Self::default()
        }
    }

    /// Fully specified sprite.
    #[must_use]
    pub fn with(texture_id: impl Into<String>, color: Color, layer: i32) -> Self {
        Self {
            texture_id: texture_id.into(),
            color,
            layer,
            visible: true,
        }
    }

    /// Sets opacity, clamped to `0.0..=1.0`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.color.a = alpha.clamp(0.0, 1.0);
    }

    /// Current opacity.
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.color.a
    }

    /// Stops the sprite from being drawn.
    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Draws the sprite again.
    pub fn show(&mut self) {
        self.visible = true;
    }
}

impl Default for Renderable {
    fn default() -> Self {
        Self {
            texture_id: String::new(),
            color: Color::WHITE,
            layer: 0,
            visible: true,
        }
    }
}
