//! # Gameplay Components
//!
//! Plain data records attached to entities. Behavior lives in the systems.

mod health;
mod network;
mod renderable;
mod transform;
mod velocity;

pub use health::Health;
pub use network::NetworkEntity;
pub use renderable::Renderable;
pub use transform::Transform;
pub use velocity::Velocity;
