//! # Espacial
//!
//! The game driver: a fixed-timestep loop over the simulation kernel in
//! `espacial_core`, plus the window/renderer interfaces it talks to.
//!
//! ## Architecture Rules
//!
//! 1. **The simulation never sees a variable delta** - systems always get
//!    exactly one fixed step
//! 2. **Render once per frame** - however many steps that frame ran
//! 3. **Collaborators are borrowed** - the loop owns no window, GPU or world

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod collaborators;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod headless;
pub mod render;
pub mod timestep;

pub use collaborators::{RenderStats, Renderer, Window};
pub use config::LoopConfig;
pub use error::{LoopError, LoopResult};
pub use game_loop::{GameLoop, LoopState, StopHandle};
pub use headless::{DrawSprite, HeadlessWindow, RecordingRenderer};
pub use timestep::{FixedTimestep, FpsCounter};
