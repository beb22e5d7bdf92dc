//! Hit points of players, enemies and destructible objects.

use crate::ecs::Component;

/// Current and maximum hit points plus a short invulnerability window.
///
/// Every mutator keeps `0 <= current <= maximum`. Fields are private so the
/// invariant cannot be bypassed.
///
/// ```rust
/// use espacial_core::Health;
///
/// let mut hp = Health::new(100);
/// hp.damage(25);
/// assert_eq!(hp.current(), 75);
/// hp.heal(500);
/// assert!(hp.is_full());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Health {
    current: u32,
    maximum: u32,
    invulnerability_frames: u32,
}

impl Component for Health {
    const NAME: &'static str = "Health";
}

impl Health {
    /// Full health at `hp` hit points.
    #[must_use]
    pub const fn new(hp: u32) -> Self {
        Self {
            current: hp,
            maximum: hp,
            invulnerability_frames: 0,
        }
    }

    /// `current` out of `maximum`; `current` is clamped to `maximum`.
    #[must_use]
    pub fn with_current(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
            invulnerability_frames: 0,
        }
    }

    /// Current hit points.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Remaining invulnerability frames.
    #[must_use]
    pub const fn invulnerability_frames(&self) -> u32 {
        self.invulnerability_frames
    }

    /// Applies damage, flooring at zero.
    ///
    /// A no-op while invulnerable.
    ///
    /// # Returns
    ///
    /// `true` if the entity is dead after this hit. Always `false` when the
    /// hit was ignored.
    pub fn damage(&mut self, amount: u32) -> bool {
        if self.is_invulnerable() {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        self.is_dead()
    }

    /// Restores hit points, capped at the maximum.
    pub fn heal(&mut self, amount: u32) {
        self.current = self.current.saturating_add(amount).min(self.maximum);
    }

    /// Restores hit points to the maximum.
    pub fn full_heal(&mut self) {
        self.current = self.maximum;
    }

    /// `true` at zero hit points.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.current == 0
    }

    /// `true` at maximum hit points.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.current >= self.maximum
    }

    /// `current / maximum` in `0.0..=1.0`; zero when the maximum is zero.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.maximum == 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }

    /// Ignores damage for the next `frames` fixed steps (60 = one second).
    pub fn set_invulnerability(&mut self, frames: u32) {
        self.invulnerability_frames = frames;
    }

    /// Counts the invulnerability window down by one step.
    pub fn tick_invulnerability(&mut self) {
        self.invulnerability_frames = self.invulnerability_frames.saturating_sub(1);
    }

    /// `true` while damage is being ignored.
    #[must_use]
    pub const fn is_invulnerable(&self) -> bool {
        self.invulnerability_frames > 0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}
