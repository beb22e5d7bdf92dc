//! # Espacial Shared
//!
//! Plain data types used by both the core kernel and the game crate.
//!
//! ## Rule
//!
//! This crate must never depend on a window or graphics API. Anything that
//! touches a GPU lives behind the collaborator traits in `espacial`.

#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{
    DEFAULT_TARGET_FPS, FIXED_STEP, FIXED_STEP_HZ, FPS_WINDOW, MAX_FRAME_DELTA,
};
pub use math::{Color, Vec2};
