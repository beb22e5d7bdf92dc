//! # Fixed Timestep
//!
//! Frame time is fed into an accumulator and drained in whole simulation
//! steps, so the simulation advances by the same `dt` no matter how the
//! wall clock is sliced.
//!
//! ```text
//! frame delta ─► clamp(max) ─► accumulator ─► while acc >= step { step; acc -= step }
//! ```
//!
//! All arithmetic is on integer-nanosecond [`Duration`]s, so splitting the
//! same span into different frame deltas yields the same step count.

use std::time::{Duration, Instant};

use espacial_shared::MAX_FRAME_DELTA;

/// Accumulator that converts variable frame deltas into fixed steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    max_delta: Duration,
    accumulator: Duration,
}

impl FixedTimestep {
    /// Creates an empty accumulator draining `step` at a time. Frame deltas
    /// are capped at [`MAX_FRAME_DELTA`].
    ///
    /// A zero `step` is rejected in debug builds; in release it never drains.
    #[must_use]
    pub const fn new(step: Duration) -> Self {
        debug_assert!(!step.is_zero(), "fixed step must be non-zero");
        Self {
            step,
            max_delta: MAX_FRAME_DELTA,
            accumulator: Duration::ZERO,
        }
    }

    /// Caps a frame delta to [`MAX_FRAME_DELTA`].
    #[inline]
    #[must_use]
    pub fn clamp(&self, frame_delta: Duration) -> Duration {
        frame_delta.min(self.max_delta)
    }

    /// Clamps `frame_delta` and adds it to the accumulator.
    ///
    /// # Returns
    ///
    /// The clamped delta.
    pub fn accumulate(&mut self, frame_delta: Duration) -> Duration {
        let clamped = self.clamp(frame_delta);
        if clamped < frame_delta {
            tracing::debug!(
                raw_ms = frame_delta.as_secs_f64() * 1000.0,
                clamped_ms = clamped.as_secs_f64() * 1000.0,
                "frame delta clamped"
            );
        }
        self.accumulator += clamped;
        clamped
    }

    /// Takes one step out of the accumulator if a whole step is available.
    #[inline]
    pub fn try_consume(&mut self) -> bool {
        if !self.step.is_zero() && self.accumulator >= self.step {
            self.accumulator -= self.step;
            true
        } else {
            false
        }
    }

    /// Leftover fraction of a step in `[0, 1)`, for render interpolation.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        (self.accumulator.as_secs_f64() / self.step.as_secs_f64()) as f32
    }

    /// Time not yet consumed by a step.
    #[must_use]
    pub const fn accumulator(&self) -> Duration {
        self.accumulator
    }

    /// Length of one step.
    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Drops any accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

/// Frames-per-second average over a minimum wall-clock window.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window: Duration,
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    /// Starts counting at `now`.
    #[must_use]
    pub const fn new(window: Duration, now: Instant) -> Self {
        Self {
            window,
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Records a presented frame at `now`.
    ///
    /// # Returns
    ///
    /// The new average when this frame closed a window.
    pub fn record_frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    /// Average of the last completed window; zero before the first one.
    #[must_use]
    pub const fn fps(&self) -> f32 {
        self.fps
    }

    /// Restarts the current window at `now`.
    pub fn restart(&mut self, now: Instant) {
        self.window_start = now;
        self.frames = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espacial_shared::FIXED_STEP;

    fn drain(timestep: &mut FixedTimestep) -> u32 {
        let mut steps = 0;
        while timestep.try_consume() {
            steps += 1;
        }
        steps
    }

    #[test]
    fn test_split_independent_step_count() {
        let mut split = FixedTimestep::new(FIXED_STEP);
        let mut steps_split = 0;
        for _ in 0..10 {
            split.accumulate(Duration::from_millis(10));
            steps_split += drain(&mut split);
        }

        let mut whole = FixedTimestep::new(FIXED_STEP);
        whole.accumulate(Duration::from_millis(100));
        let steps_whole = drain(&mut whole);

        assert_eq!(steps_split, 6);
        assert_eq!(steps_whole, 6);
        assert_eq!(split.accumulator(), whole.accumulator());
    }

    #[test]
    fn test_uneven_split_matches_whole_frame() {
        let mut split = FixedTimestep::new(FIXED_STEP);
        let mut steps_split = 0;
        for ms in [7, 33, 1, 16, 17, 26] {
            split.accumulate(Duration::from_millis(ms));
            steps_split += drain(&mut split);
        }

        let mut whole = FixedTimestep::new(FIXED_STEP);
        whole.accumulate(Duration::from_millis(100));
        let steps_whole = drain(&mut whole);

        assert_eq!(steps_split, 6);
        assert_eq!(steps_split, steps_whole);
        assert_eq!(split.accumulator(), whole.accumulator());
        assert_eq!(split.accumulator(), Duration::from_nanos(4));
    }

    #[test]
    #[should_panic(expected = "fixed step must be non-zero")]
    #[cfg(debug_assertions)]
    fn test_zero_step_rejected() {
        let _ = FixedTimestep::new(Duration::ZERO);
    }

    #[test]
    fn test_spiral_of_death_guard() {
        let mut timestep = FixedTimestep::new(FIXED_STEP);
        let clamped = timestep.accumulate(Duration::from_secs(5));
        assert_eq!(clamped, Duration::from_millis(250));
        assert_eq!(drain(&mut timestep), 15);
    }

    #[test]
    fn test_alpha() {
        let mut timestep = FixedTimestep::new(Duration::from_millis(10));
        timestep.accumulate(Duration::from_millis(25));
        assert_eq!(drain(&mut timestep), 2);
        assert!((timestep.alpha() - 0.5).abs() < 1e-6);

        timestep.reset();
        assert_eq!(timestep.alpha(), 0.0);
    }

    #[test]
    fn test_fps_window() {
        let start = Instant::now();
        let mut fps = FpsCounter::new(Duration::from_secs(1), start);

        for i in 1..60 {
            assert!(fps.record_frame(start + Duration::from_millis(i * 16)).is_none());
        }
        let avg = fps.record_frame(start + Duration::from_secs(1)).unwrap();
        assert!((avg - 60.0).abs() < 1e-3);
        assert!((fps.fps() - 60.0).abs() < 1e-3);
    }
}
