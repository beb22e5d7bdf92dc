//! # Render Pass
//!
//! Runs once per presented frame, after the fixed steps. Reads the registry,
//! never writes it.

use espacial_core::{Registry, Renderable, Transform};
use espacial_shared::{Color, Vec2};

use crate::collaborators::Renderer;

/// Default clear colour (deep space blue).
pub const BACKGROUND: Color = Color::new(0.1, 0.1, 0.15, 1.0);

/// Base sprite size in pixels, before the transform's scale.
pub const SPRITE_SIZE: Vec2 = Vec2::new(64.0, 64.0);

/// Clears, draws every visible sprite in ascending layer order and presents.
///
/// Sprites on the same layer keep registry iteration order.
///
/// # Returns
///
/// Number of sprites drawn.
pub fn render_frame(registry: &Registry, renderer: &mut dyn Renderer, background: Color) -> usize {
    renderer.clear(background);

    let mut sprites: Vec<(&Transform, &Renderable)> = registry
        .view::<(Transform, Renderable)>()
        .iter()
        .filter_map(|entity| {
            let renderable = registry.try_get::<Renderable>(entity)?;
            let transform = registry.try_get::<Transform>(entity)?;
            renderable.visible.then_some((transform, renderable))
        })
        .collect();
    sprites.sort_by_key(|(_, renderable)| renderable.layer);

    for (transform, renderable) in &sprites {
        renderer.draw_sprite(
            &renderable.texture_id,
            transform.position,
            SPRITE_SIZE.mul_elements(transform.scale),
            transform.rotation,
            renderable.color,
        );
    }

    renderer.present();
    sprites.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::RecordingRenderer;

    fn sprite(registry: &mut Registry, texture: &str, layer: i32, x: f32) {
        let e = registry.create();
        registry.add(e, Transform::new(Vec2::new(x, 0.0))).unwrap();
        registry
            .add(e, Renderable::with(texture, Color::WHITE, layer))
            .unwrap();
    }

    #[test]
    fn test_draws_in_layer_order() {
        let mut registry = Registry::new();
        sprite(&mut registry, "ui", 40, 0.0);
        sprite(&mut registry, "player", 10, 1.0);
        sprite(&mut registry, "background", 0, 2.0);
        sprite(&mut registry, "enemy", 10, 3.0);

        let mut renderer = RecordingRenderer::new();
        assert_eq!(render_frame(&registry, &mut renderer, BACKGROUND), 4);

        let order: Vec<&str> = renderer.draws().iter().map(|d| d.texture_id.as_str()).collect();
        assert_eq!(order, ["background", "player", "enemy", "ui"]);
        assert_eq!(renderer.clear_color(), Some(BACKGROUND));
        assert_eq!(renderer.frames_presented(), 1);
    }

    #[test]
    fn test_skips_hidden_and_incomplete() {
        let mut registry = Registry::new();
        sprite(&mut registry, "shown", 0, 0.0);

        let hidden = registry.create();
        registry.add(hidden, Transform::default()).unwrap();
        registry.add(hidden, Renderable::new("hidden")).unwrap().hide();

        let no_transform = registry.create();
        registry.add(no_transform, Renderable::new("floating")).unwrap();

        let mut renderer = RecordingRenderer::new();
        assert_eq!(render_frame(&registry, &mut renderer, Color::BLACK), 1);
        assert_eq!(renderer.draws()[0].texture_id, "shown");
        assert_eq!(renderer.stats().draw_calls, 1);
    }

    #[test]
    fn test_size_follows_scale() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry
            .add(e, Transform::with(Vec2::new(5.0, 6.0), 45.0, Vec2::new(2.0, 0.5)))
            .unwrap();
        registry.add(e, Renderable::new("ship")).unwrap();

        let mut renderer = RecordingRenderer::new();
        render_frame(&registry, &mut renderer, BACKGROUND);

        let draw = &renderer.draws()[0];
        assert_eq!(draw.size, Vec2::new(128.0, 32.0));
        assert_eq!(draw.position, Vec2::new(5.0, 6.0));
        assert_eq!(draw.rotation_degrees, 45.0);
    }
}
