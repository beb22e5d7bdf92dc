//! # Espacial Core
//!
//! The simulation kernel: an entity registry with generational identifiers,
//! sparse-set component stores, snapshot views, the gameplay components and
//! the systems that run once per fixed step.
//!
//! ## Architecture Rules
//!
//! 1. **Registry is passed, never global** - every system takes `&mut Registry`
//! 2. **Components are plain data** - behavior lives in `systems`
//! 3. **Stale identifiers never alias** - slots are reused with a new generation
//!
//! ## Example
//!
//! ```rust
//! use espacial_core::{systems::movement, Registry, Transform, Vec2, Velocity};
//!
//! let mut registry = Registry::new();
//! let ship = registry.create_named("ship");
//! registry.add(ship, Transform::default()).unwrap();
//! registry.add(ship, Velocity::new(Vec2::new(100.0, 50.0))).unwrap();
//!
//! movement::update(&mut registry, 0.1);
//!
//! let pos = registry.get::<Transform>(ship).unwrap().position;
//! assert!((pos.x - 10.0).abs() < 1e-4 && (pos.y - 5.0).abs() < 1e-4);
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod components;
pub mod ecs;
pub mod systems;

pub use components::{Health, NetworkEntity, Renderable, Transform, Velocity};
pub use ecs::{
    Component, ComponentSet, ComponentStorage, EcsError, EcsResult, Entity, Registry,
    RegistryStats, View,
};
pub use espacial_shared::{Color, Vec2};
pub use systems::{Schedule, SpeedLimits};
