//! # Collaborator Interfaces
//!
//! The game loop drives a window and a renderer it does not own. Both are
//! trait objects so a GPU backend, a test double or the headless
//! implementations in [`crate::headless`] can be swapped in freely.

use std::path::Path;

use espacial_shared::{Color, Vec2};

/// A presentation surface that produces events.
pub trait Window {
    /// `false` once the user (or the host) closed the window.
    fn is_open(&self) -> bool;

    /// Drains pending OS/input events.
    fn poll_events(&mut self);

    /// Shows the frame that was just rendered.
    fn swap_buffers(&mut self);

    /// Drawable area in pixels.
    fn size(&self) -> (u32, u32);
}

/// Counters for the most recently presented frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    /// Number of draw calls.
    pub draw_calls: u32,
    /// Triangles submitted.
    pub triangles: u32,
    /// Vertices submitted.
    pub vertices: u32,
    /// Time between `clear` and `present`, in milliseconds.
    pub frame_time_ms: f32,
}

/// A 2D sprite renderer.
pub trait Renderer {
    /// Creates backend resources for a `width` x `height` target.
    ///
    /// Returns `false` if the backend could not start.
    fn initialize(&mut self, width: u32, height: u32) -> bool;

    /// Releases backend resources. Safe to call more than once.
    fn shutdown(&mut self);

    /// Starts a frame by clearing the target to `color`.
    fn clear(&mut self, color: Color);

    /// Finishes the frame.
    fn present(&mut self);

    /// Sets the drawable region of the target.
    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32);

    /// Queues one textured quad. `position` is the sprite's top-left corner
    /// in pixels; rotation is in degrees around its center.
    fn draw_sprite(
        &mut self,
        texture_id: &str,
        position: Vec2,
        size: Vec2,
        rotation_degrees: f32,
        tint: Color,
    );

    /// Loads a texture under `id`. Returns `false` on failure.
    fn load_texture(&mut self, id: &str, path: &Path) -> bool;

    /// Drops the texture registered under `id`, if any.
    fn unload_texture(&mut self, id: &str);

    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Counters for the last presented frame.
    fn stats(&self) -> RenderStats;

    /// Zeroes the counters.
    fn reset_stats(&mut self);
}
