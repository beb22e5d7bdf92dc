//! # Entity Component System
//!
//! A small sparse-set ECS sized for a 2D game at 60 Hz.
//!
//! ## Design Philosophy
//!
//! - Entity IDs are slot indices with generation counters
//! - One dense store per component type, created on first use
//! - Views snapshot their matching set, so iteration is never invalidated
//! - The registry is passed explicitly; there is no global world

mod component;
mod entity;
mod error;
mod registry;
mod storage;
mod view;

pub use component::Component;
pub use entity::Entity;
pub use error::{EcsError, EcsResult};
pub use registry::{Registry, RegistryStats};
pub use storage::ComponentStorage;
pub use view::{ComponentSet, View};
