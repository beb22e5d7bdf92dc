//! # Headless Collaborators
//!
//! A window and a renderer that never touch the OS or a GPU. They back the
//! binary on machines without a display and let tests inspect exactly what
//! the loop did each frame.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use espacial_shared::{Color, Vec2};

use crate::collaborators::{RenderStats, Renderer, Window};

const TRIANGLES_PER_SPRITE: u32 = 2;
const VERTICES_PER_SPRITE: u32 = 6;

// =============================================================================
// WINDOW
// =============================================================================

/// Window that stays open until closed or until its frame budget runs out.
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    width: u32,
    height: u32,
    open: bool,
    frame_budget: Option<u64>,
    polls: u64,
    swaps: u64,
}

impl HeadlessWindow {
    /// Opens a `width` x `height` window with no frame limit.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            open: true,
            frame_budget: None,
            polls: 0,
            swaps: 0,
        }
    }

    /// Closes itself after `frames` presented frames.
    #[must_use]
    pub const fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self.open = frames > 0;
        self
    }

    /// Closes the window. The loop exits at its next iteration.
    pub fn close(&mut self) {
        if self.open {
            tracing::debug!(swaps = self.swaps, "headless window closed");
        }
        self.open = false;
    }

    /// Number of `poll_events` calls.
    #[must_use]
    pub const fn polls(&self) -> u64 {
        self.polls
    }

    /// Number of `swap_buffers` calls.
    #[must_use]
    pub const fn swaps(&self) -> u64 {
        self.swaps
    }
}

impl Window for HeadlessWindow {
    fn is_open(&self) -> bool {
        self.open
    }

    fn poll_events(&mut self) {
        self.polls += 1;
    }

    fn swap_buffers(&mut self) {
        self.swaps += 1;
        if self.frame_budget.is_some_and(|budget| self.swaps >= budget) {
            self.close();
        }
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// =============================================================================
// RENDERER
// =============================================================================

/// One recorded `draw_sprite` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSprite {
    /// Texture requested.
    pub texture_id: String,
    /// Top-left corner in pixels.
    pub position: Vec2,
    /// Size in pixels.
    pub size: Vec2,
    /// Rotation in degrees.
    pub rotation_degrees: f32,
    /// Tint.
    pub tint: Color,
}

/// Renderer that records calls instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    initialized: bool,
    viewport: (i32, i32, u32, u32),
    clear_color: Option<Color>,
    draws: Vec<DrawSprite>,
    textures: HashMap<String, PathBuf>,
    current: RenderStats,
    last_frame: RenderStats,
    frame_started: Option<Instant>,
    frames_presented: u64,
}

impl RecordingRenderer {
    /// Creates an uninitialized renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` between `initialize` and `shutdown`.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Sprites drawn since the last `clear`, in submission order.
    #[must_use]
    pub fn draws(&self) -> &[DrawSprite] {
        &self.draws
    }

    /// Colour of the last `clear`.
    #[must_use]
    pub const fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    /// Current viewport as `(x, y, width, height)`.
    #[must_use]
    pub const fn viewport(&self) -> (i32, i32, u32, u32) {
        self.viewport
    }

    /// Whether a texture is registered under `id`.
    #[must_use]
    pub fn has_texture(&self, id: &str) -> bool {
        self.textures.contains_key(id)
    }

    /// Number of `present` calls.
    #[must_use]
    pub const fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Renderer for RecordingRenderer {
    fn initialize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            tracing::error!(width, height, "cannot create a zero-sized render target");
            return false;
        }
        self.set_viewport(0, 0, width, height);
        self.initialized = true;
        tracing::info!(width, height, "recording renderer initialized");
        true
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        self.textures.clear();
        self.draws.clear();
        self.initialized = false;
        tracing::info!(frames = self.frames_presented, "recording renderer shut down");
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = Some(color);
        self.draws.clear();
        self.current = RenderStats::default();
        self.frame_started = Some(Instant::now());
    }

    fn present(&mut self) {
        if let Some(started) = self.frame_started.take() {
            self.current.frame_time_ms = started.elapsed().as_secs_f32() * 1000.0;
        }
        self.last_frame = self.current;
        self.frames_presented += 1;
    }

    fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.viewport = (x, y, width, height);
    }

    fn draw_sprite(
        &mut self,
        texture_id: &str,
        position: Vec2,
        size: Vec2,
        rotation_degrees: f32,
        tint: Color,
    ) {
        self.draws.push(DrawSprite {
            texture_id: texture_id.to_owned(),
            position,
            size,
            rotation_degrees,
            tint,
        });
        self.current.draw_calls += 1;
        self.current.triangles += TRIANGLES_PER_SPRITE;
        self.current.vertices += VERTICES_PER_SPRITE;
    }

    fn load_texture(&mut self, id: &str, path: &Path) -> bool {
        if id.is_empty() {
            tracing::warn!(path = %path.display(), "texture id must not be empty");
            return false;
        }
        tracing::debug!(id, path = %path.display(), "texture registered");
        self.textures.insert(id.to_owned(), path.to_path_buf());
        true
    }

    fn unload_texture(&mut self, id: &str) {
        self.textures.remove(id);
    }

    fn name(&self) -> &str {
        "headless"
    }

    fn stats(&self) -> RenderStats {
        self.last_frame
    }

    fn reset_stats(&mut self) {
        self.current = RenderStats::default();
        self.last_frame = RenderStats::default();
    }
}
