//! # ECS Error Types
//!
//! Programming errors surfaced by the registry. Both are unrecoverable at the
//! point of detection and are propagated to the caller.

use thiserror::Error;

use super::entity::Entity;

/// Errors that can occur when accessing the registry.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// The entity was never created, has been destroyed, or is a stale
    /// identifier for a slot that now holds a different entity.
    #[error("invalid entity {entity}")]
    InvalidEntity {
        /// The offending identifier.
        entity: Entity,
    },

    /// The entity is valid but does not hold the requested component.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// The entity that was queried.
        entity: Entity,
        /// Name of the component type that was requested.
        component: &'static str,
    },
}

/// Result type for registry operations.
pub type EcsResult<T> = Result<T, EcsError>;
