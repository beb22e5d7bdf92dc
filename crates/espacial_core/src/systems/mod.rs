//! # Gameplay Systems
//!
//! Free functions over `&mut Registry`, run once per fixed step by a
//! [`Schedule`]. Systems hold no state of their own.

pub mod health;
pub mod movement;
mod schedule;

pub use movement::SpeedLimits;
pub use schedule::{Schedule, SystemFn};
