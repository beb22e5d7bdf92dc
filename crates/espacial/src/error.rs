//! # Driver Error Types
//!
//! Everything that can stop the game loop from starting or keep running.

use thiserror::Error;

use espacial_core::EcsError;

use crate::game_loop::LoopState;

/// Errors raised by the game loop and its setup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoopError {
    /// `initialize` was called without one of its collaborators.
    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The renderer refused to start.
    #[error("renderer '{name}' failed to initialize at {width}x{height}")]
    RendererInit {
        /// Renderer name.
        name: String,
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// An operation was called in a state that does not allow it.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        /// What was attempted.
        operation: &'static str,
        /// State the loop was in.
        state: LoopState,
    },

    /// The loop configuration could not be read or is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A gameplay system failed during a fixed step.
    #[error("system failed: {0}")]
    System(#[from] EcsError),
}

/// Result type for driver operations.
pub type LoopResult<T> = Result<T, LoopError>;
