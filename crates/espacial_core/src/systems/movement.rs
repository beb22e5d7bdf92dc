//! # Movement System
//!
//! Integrates [`Velocity`] into [`Transform`] once per fixed step.
//!
//! ```text
//! position += linear  * dt
//! rotation += angular * dt   (then normalized into [0, 360))
//! ```

use crate::components::{Transform, Velocity};
use crate::ecs::{Entity, Registry};

/// Full turn in degrees.
const FULL_TURN: f32 = 360.0;

/// Beyond this magnitude a single `%` brings the angle close to range before
/// the exact add/subtract pass. Keeps the pass bounded for huge rates.
const REDUCE_THRESHOLD: f32 = FULL_TURN * 8.0;

/// Per-entity speed caps for [`clamp_velocities`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedLimits {
    /// Maximum linear speed (units/second). Direction is preserved.
    pub max_speed: f32,
    /// Maximum angular speed magnitude (degrees/second).
    pub max_angular_speed: f32,
}

impl SpeedLimits {
    /// Creates a pair of limits.
    #[must_use]
    pub const fn new(max_speed: f32, max_angular_speed: f32) -> Self {
        Self {
            max_speed,
            max_angular_speed,
        }
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
///
/// Tiny negative inputs resolve to exactly `0.0`, never `360.0`. Non-finite
/// input yields `0.0`.
#[inline]
#[must_use]
pub fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }

    let mut r = if degrees.abs() > REDUCE_THRESHOLD {
        degrees % FULL_TURN
    } else {
        degrees
    };

    loop {
        if r >= FULL_TURN {
            r -= FULL_TURN;
        } else if r < 0.0 {
            r += FULL_TURN;
        } else {
            return r;
        }
    }
}

#[inline]
fn integrate(transform: &mut Transform, velocity: &Velocity, dt: f32) {
    transform.position += velocity.linear * dt;
    transform.rotation = normalize_degrees(transform.rotation + velocity.angular * dt);
}

/// Advances every entity holding both a [`Transform`] and a [`Velocity`].
///
/// # Returns
///
/// Number of entities moved.
pub fn update(registry: &mut Registry, dt: f32) -> usize {
    registry.for_each_pair::<Transform, Velocity, _>(|_, transform, velocity| {
        integrate(transform, velocity, dt);
    })
}

/// Advances a single entity. No-op unless it holds both components.
///
/// # Returns
///
/// `true` if the entity was moved.
pub fn update_entity(registry: &mut Registry, entity: Entity, dt: f32) -> bool {
    let Some(&velocity) = registry.try_get::<Velocity>(entity) else {
        return false;
    };
    match registry.get_mut::<Transform>(entity) {
        Ok(transform) => {
            integrate(transform, &velocity, dt);
            true
        }
        Err(_) => false,
    }
}

/// Caps every [`Velocity`] to `limits`.
///
/// # Returns
///
/// Number of velocities that were changed.
pub fn clamp_velocities(registry: &mut Registry, limits: SpeedLimits) -> usize {
    let Some(store) = registry.storage_mut::<Velocity>() else {
        return 0;
    };

    let max_speed = limits.max_speed.max(0.0);
    let max_angular = limits.max_angular_speed.max(0.0);
    let mut clamped = 0;

    for (_, velocity) in store.iter_mut() {
        let mut changed = false;

        let speed = velocity.speed();
        if speed > max_speed {
            velocity.linear = if speed > 0.0 {
                velocity.linear * (max_speed / speed)
            } else {
                velocity.linear
            };
            changed = true;
        }

        if velocity.angular.abs() > max_angular {
            velocity.angular = velocity.angular.clamp(-max_angular, max_angular);
            changed = true;
        }

        if changed {
            clamped += 1;
        }
    }

    if clamped > 0 {
        tracing::trace!(clamped, "velocities clamped");
    }
    clamped
}

/// [`clamp_velocities`] followed by [`update`].
///
/// # Returns
///
/// Number of entities moved.
pub fn update_clamped(registry: &mut Registry, dt: f32, limits: SpeedLimits) -> usize {
    clamp_velocities(registry, limits);
    update(registry, dt)
}
