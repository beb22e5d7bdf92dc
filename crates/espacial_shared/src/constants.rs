//! # Timing Constants
//!
//! Defaults for the fixed-timestep driver. All of them can be overridden by
//! the loop configuration before a run starts.

use std::time::Duration;

/// Simulation rate (fixed steps per second).
pub const FIXED_STEP_HZ: u32 = 60;

/// Length of one simulation step.
///
/// Stored as whole nanoseconds (truncated) so that accumulating and draining
/// it is exact integer arithmetic: `6 * FIXED_STEP <= 100ms` holds.
pub const FIXED_STEP: Duration = Duration::from_nanos(1_000_000_000 / FIXED_STEP_HZ as u64);

/// Largest frame delta fed into the accumulator.
///
/// A stalled frame (debugger, window drag, disk hitch) is clamped to this so
/// that one bad frame triggers at most `MAX_FRAME_DELTA / FIXED_STEP` steps.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Presented frames per second the loop aims for (0 = uncapped).
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Minimum wall-clock window over which FPS is averaged.
pub const FPS_WINDOW: Duration = Duration::from_secs(1);
