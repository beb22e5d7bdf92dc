//! # Game Loop
//!
//! Fixed-timestep driver. Owns no game state: the window, renderer and
//! registry are borrowed for the lifetime of the loop.
//!
//! ```text
//! Frame N:
//! ┌──────────────────────────────────────────────────────────────┐
//! │ 1. MEASURE      wall time since frame N-1                     │
//! │ 2. CLAMP        to MAX_FRAME_DELTA (250 ms)                   │
//! │ 3. INPUT        window.poll_events()                          │
//! │ 4. ACCUMULATE   accumulator += delta                          │
//! │ 5. SIMULATE     while accumulator >= step: schedule.run(step) │
//! │ 6. RENDER       exactly once                                  │
//! │ 7. PRESENT      window.swap_buffers()                         │
//! │ 8. LIMIT        sleep the rest of the frame budget            │
//! │ 9. MEASURE FPS  rolling average over >= 1 s                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! States: `Uninitialized → Initialized → Running → Stopped`.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use espacial_core::{Registry, Schedule};
use espacial_shared::{Color, FPS_WINDOW};

use crate::collaborators::{Renderer, Window};
use crate::config::LoopConfig;
use crate::error::{LoopError, LoopResult};
use crate::render::{self, BACKGROUND};
use crate::timestep::{FixedTimestep, FpsCounter};

/// Lifecycle of a [`GameLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Created, collaborators not yet provided.
    Uninitialized,
    /// Collaborators attached; ready to run.
    Initialized,
    /// Inside [`GameLoop::run`].
    Running,
    /// Finished. Terminal.
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Stopped => "stopped",
        })
    }
}

/// Cloneable request to stop a running loop.
///
/// The flag is checked at the top of each frame; a frame in progress always
/// completes.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Asks the loop to stop.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// The fixed-timestep game loop.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use espacial::{GameLoop, HeadlessWindow, LoopConfig, RecordingRenderer};
/// use espacial_core::Registry;
///
/// let mut window = HeadlessWindow::new(800, 600);
/// let mut renderer = RecordingRenderer::new();
/// let mut registry = Registry::new();
///
/// let mut game_loop = GameLoop::new(LoopConfig::default()).unwrap();
/// game_loop
///     .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
///     .unwrap();
///
/// assert_eq!(game_loop.step_frame(Duration::from_millis(100)).unwrap(), 6);
/// ```
pub struct GameLoop<'a> {
    config: LoopConfig,
    schedule: Schedule,
    background: Color,
    state: LoopState,

    window: Option<&'a mut dyn Window>,
    renderer: Option<&'a mut dyn Renderer>,
    registry: Option<&'a mut Registry>,

    timestep: FixedTimestep,
    stop: StopHandle,

    delta_time: f32,
    fps: f32,
    frame_count: u64,
    total_steps: u64,
}

impl<'a> GameLoop<'a> {
    /// Creates a loop running the standard gameplay schedule.
    ///
    /// # Errors
    ///
    /// [`LoopError::Config`] if `config` fails validation.
    pub fn new(config: LoopConfig) -> LoopResult<Self> {
        config.validate()?;
        let timestep = FixedTimestep::new(config.fixed_step());

        Ok(Self {
            config,
            schedule: Schedule::gameplay(),
            background: BACKGROUND,
            state: LoopState::Uninitialized,
            window: None,
            renderer: None,
            registry: None,
            timestep,
            stop: StopHandle::default(),
            delta_time: 0.0,
            fps: 0.0,
            frame_count: 0,
            total_steps: 0,
        })
    }

    /// Replaces the system chain run on every fixed step.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Replaces the clear colour.
    #[must_use]
    pub const fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Attaches the collaborators.
    ///
    /// # Errors
    ///
    /// - [`LoopError::InvalidState`] unless the loop is uninitialized
    /// - [`LoopError::MissingCollaborator`] if any collaborator is `None`
    pub fn initialize(
        &mut self,
        window: Option<&'a mut dyn Window>,
        renderer: Option<&'a mut dyn Renderer>,
        registry: Option<&'a mut Registry>,
    ) -> LoopResult<()> {
        if self.state != LoopState::Uninitialized {
            return Err(self.invalid_state("initialize"));
        }

        let missing = match (&window, &renderer, &registry) {
            (None, _, _) => Some("window"),
            (_, None, _) => Some("renderer"),
            (_, _, None) => Some("registry"),
            _ => None,
        };
        if let Some(name) = missing {
            tracing::error!(collaborator = name, "game loop initialization failed");
            return Err(LoopError::MissingCollaborator(name));
        }

        self.window = window;
        self.renderer = renderer;
        self.registry = registry;
        self.state = LoopState::Initialized;

        tracing::info!(systems = ?self.schedule, "game loop initialized");
        Ok(())
    }

    /// Runs until the window closes or a stop is requested. Blocking.
    ///
    /// # Errors
    ///
    /// - [`LoopError::InvalidState`] unless the loop is initialized
    /// - [`LoopError::System`] if a system fails; the loop is then stopped
    pub fn run(&mut self) -> LoopResult<()> {
        if self.state != LoopState::Initialized {
            return Err(self.invalid_state("run"));
        }
        self.state = LoopState::Running;

        let budget = self.config.frame_budget();
        tracing::info!(
            target_fps = self.config.target_fps,
            fixed_step_hz = self.config.fixed_step_hz,
            renderer = self.renderer.as_deref().map_or("none", |r| r.name()),
            "game loop started"
        );

        let mut last_frame = Instant::now();
        let mut fps = FpsCounter::new(FPS_WINDOW, last_frame);
        let mut windows_since_report = 0;

        while !self.stop.is_stop_requested() && self.window_open() {
            let frame_start = Instant::now();
            let frame_delta = frame_start.saturating_duration_since(last_frame);
            last_frame = frame_start;

            self.advance(frame_delta)?;

            if let Some(budget) = budget {
                let spent = frame_start.elapsed();
                if spent < budget {
                    std::thread::sleep(budget - spent);
                }
            }

            if let Some(average) = fps.record_frame(Instant::now()) {
                self.fps = average;
                windows_since_report += 1;
                if self.config.fps_report_interval > 0
                    && windows_since_report >= self.config.fps_report_interval
                {
                    windows_since_report = 0;
                    self.report();
                }
            }
        }

        self.state = LoopState::Stopped;
        tracing::info!(
            frames = self.frame_count,
            steps = self.total_steps,
            "game loop stopped"
        );
        Ok(())
    }

    /// Runs one frame (clamp, input, fixed steps, render, present) for an
    /// explicit `frame_delta`, without touching the wall clock.
    ///
    /// # Returns
    ///
    /// Number of fixed steps run.
    ///
    /// # Errors
    ///
    /// - [`LoopError::InvalidState`] unless the loop is initialized or running
    /// - [`LoopError::System`] if a system fails; the loop is then stopped
    pub fn step_frame(&mut self, frame_delta: Duration) -> LoopResult<u32> {
        match self.state {
            LoopState::Initialized | LoopState::Running => self.advance(frame_delta),
            _ => Err(self.invalid_state("step a frame")),
        }
    }

    fn advance(&mut self, frame_delta: Duration) -> LoopResult<u32> {
        let (Some(window), Some(renderer), Some(registry)) = (
            self.window.as_deref_mut(),
            self.renderer.as_deref_mut(),
            self.registry.as_deref_mut(),
        ) else {
            return Err(LoopError::InvalidState {
                operation: "step a frame",
                state: self.state,
            });
        };

        window.poll_events();
        let clamped = self.timestep.accumulate(frame_delta);
        self.delta_time = clamped.as_secs_f32();

        let dt = self.timestep.step().as_secs_f32();
        let mut steps = 0;
        while self.timestep.try_consume() {
            if let Err(err) = self.schedule.run(registry, dt) {
                self.state = LoopState::Stopped;
                tracing::error!(error = %err, frame = self.frame_count, "fixed step failed, stopping");
                return Err(err.into());
            }
            steps += 1;
        }
        self.total_steps += u64::from(steps);

        render::render_frame(registry, renderer, self.background);
        window.swap_buffers();
        self.frame_count += 1;

        Ok(steps)
    }

    fn report(&self) {
        let stats = self.renderer.as_deref().map(Renderer::stats).unwrap_or_default();
        tracing::debug!(
            fps = self.fps,
            draw_calls = stats.draw_calls,
            triangles = stats.triangles,
            dt_ms = self.delta_time * 1000.0,
            "frame report"
        );
    }

    fn window_open(&self) -> bool {
        self.window.as_deref().is_some_and(Window::is_open)
    }

    fn invalid_state(&self, operation: &'static str) -> LoopError {
        tracing::error!(operation, state = %self.state, "invalid game loop state");
        LoopError::InvalidState {
            operation,
            state: self.state,
        }
    }

    /// Requests a cooperative stop.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// A handle that can request a stop from elsewhere (including a system).
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Stops the loop and releases the collaborators. Idempotent.
    pub fn shutdown(&mut self) {
        let attached = self.window.is_some() || self.renderer.is_some() || self.registry.is_some();
        self.window = None;
        self.renderer = None;
        self.registry = None;

        if self.state == LoopState::Uninitialized || (self.state == LoopState::Stopped && !attached) {
            return;
        }
        self.state = LoopState::Stopped;
        tracing::info!(frames = self.frame_count, "game loop shut down");
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Average FPS over the last completed window.
    #[must_use]
    pub const fn fps(&self) -> f32 {
        self.fps
    }

    /// Clamped delta of the last frame, in seconds.
    #[must_use]
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Frames presented so far.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Fixed steps run so far.
    #[must_use]
    pub const fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Leftover fraction of a step, for interpolating between states.
    #[must_use]
    pub fn interpolation_alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// The attached registry, if any.
    #[must_use]
    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessWindow, RecordingRenderer};
    use espacial_core::{EcsError, Entity, Health};

    fn config() -> LoopConfig {
        LoopConfig::default().with_target_fps(0)
    }

    #[test]
    fn test_initialize_requires_every_collaborator() {
        let mut window = HeadlessWindow::new(800, 600);
        let mut renderer = RecordingRenderer::new();
        let mut registry = Registry::new();

        let mut game_loop = GameLoop::new(config()).unwrap();
        assert_eq!(
            game_loop.initialize(None, Some(&mut renderer), Some(&mut registry)),
            Err(LoopError::MissingCollaborator("window"))
        );
        assert_eq!(game_loop.state(), LoopState::Uninitialized);

        let mut game_loop = GameLoop::new(config()).unwrap();
        assert_eq!(
            game_loop.initialize(Some(&mut window), None, None),
            Err(LoopError::MissingCollaborator("renderer"))
        );

        let mut window = HeadlessWindow::new(800, 600);
        let mut renderer = RecordingRenderer::new();
        let mut game_loop = GameLoop::new(config()).unwrap();
        assert_eq!(
            game_loop.initialize(Some(&mut window), Some(&mut renderer), None),
            Err(LoopError::MissingCollaborator("registry"))
        );
    }

    #[test]
    fn test_run_before_initialize() {
        let mut game_loop = GameLoop::new(config()).unwrap();
        assert!(matches!(
            game_loop.run(),
            Err(LoopError::InvalidState {
                operation: "run",
                state: LoopState::Uninitialized,
            })
        ));
        assert!(game_loop.step_frame(Duration::from_millis(16)).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(GameLoop::new(config().with_fixed_step_hz(0)).is_err());
    }

    #[test]
    fn test_render_once_even_without_steps() {
        let mut window = HeadlessWindow::new(800, 600);
        let mut renderer = RecordingRenderer::new();
        let mut registry = Registry::new();

        let mut game_loop = GameLoop::new(config()).unwrap();
        game_loop
            .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
            .unwrap();

        assert_eq!(game_loop.step_frame(Duration::from_millis(1)).unwrap(), 0);
        assert_eq!(game_loop.step_frame(Duration::from_millis(50)).unwrap(), 3);
        assert_eq!(game_loop.frame_count(), 2);
        assert_eq!(game_loop.total_steps(), 3);
        assert!(game_loop.interpolation_alpha() < 1.0);
        assert!((game_loop.delta_time() - 0.05).abs() < 1e-6);

        game_loop.shutdown();
        assert_eq!(renderer.frames_presented(), 2);
        assert_eq!(window.polls(), 2);
        assert_eq!(window.swaps(), 2);
    }

    #[test]
    fn test_run_until_window_closes() {
        let mut window = HeadlessWindow::new(800, 600).with_frame_budget(3);
        let mut renderer = RecordingRenderer::new();
        let mut registry = Registry::new();

        let mut game_loop = GameLoop::new(config()).unwrap();
        game_loop
            .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
            .unwrap();
        game_loop.run().unwrap();

        assert_eq!(game_loop.state(), LoopState::Stopped);
        assert_eq!(game_loop.frame_count(), 3);
        assert!(matches!(game_loop.run(), Err(LoopError::InvalidState { .. })));
    }

    #[test]
    fn test_stop_before_run() {
        let mut window = HeadlessWindow::new(800, 600);
        let mut renderer = RecordingRenderer::new();
        let mut registry = Registry::new();

        let mut game_loop = GameLoop::new(config()).unwrap();
        game_loop
            .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
            .unwrap();

        let handle = game_loop.stop_handle();
        handle.stop();
        game_loop.run().unwrap();

        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.state(), LoopState::Stopped);
    }

    #[test]
    fn test_system_error_stops_loop() {
        let mut window = HeadlessWindow::new(800, 600);
        let mut renderer = RecordingRenderer::new();
        let mut registry = Registry::new();

        let failing = Schedule::new().with_system("lookup", |registry, _| {
            registry.get::<Health>(Entity::NULL).map(|_| ())
        });
        let mut game_loop = GameLoop::new(config()).unwrap().with_schedule(failing);
        game_loop
            .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
            .unwrap();

        assert_eq!(
            game_loop.step_frame(Duration::from_millis(20)),
            Err(LoopError::System(EcsError::InvalidEntity {
                entity: Entity::NULL
            }))
        );
        assert_eq!(game_loop.state(), LoopState::Stopped);
        assert_eq!(game_loop.frame_count(), 0);
        assert!(game_loop.step_frame(Duration::from_millis(20)).is_err());
    }

    #[test]
    fn test_shutdown_idempotent() {
        let mut window = HeadlessWindow::new(800, 600);
        let mut renderer = RecordingRenderer::new();
        let mut registry = Registry::new();

        let mut game_loop = GameLoop::new(config()).unwrap();
        game_loop.shutdown();
        assert_eq!(game_loop.state(), LoopState::Uninitialized);

        game_loop
            .initialize(Some(&mut window), Some(&mut renderer), Some(&mut registry))
            .unwrap();
        assert!(game_loop.registry().is_some());

        game_loop.shutdown();
        game_loop.shutdown();
        assert_eq!(game_loop.state(), LoopState::Stopped);
        assert!(game_loop.registry().is_none());
    }
}
