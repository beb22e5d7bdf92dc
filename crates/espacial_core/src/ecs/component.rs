//! # Component Trait
//!
//! Components are pure data containers with no behavior.

/// Marker trait for ECS components.
///
/// Any `'static` type can be a component once it names itself; the name is
/// used in diagnostics and in [`EcsError::MissingComponent`](super::EcsError).
///
/// # Example
///
/// ```rust
/// use espacial_core::Component;
///
/// struct Score(u32);
///
/// impl Component for Score {
///     const NAME: &'static str = "Score";
/// }
/// ```
pub trait Component: 'static {
    /// Human-readable component name.
    const NAME: &'static str;
}
