//! # System Schedule
//!
//! Ordered chain of gameplay systems run once per fixed step. Systems run in
//! insertion order and each observes the effects of the ones before it.

use std::fmt;

use crate::ecs::{EcsResult, Registry};

use super::{health, movement};

/// A gameplay system: mutates the registry for one fixed step of `dt` seconds.
pub type SystemFn = Box<dyn FnMut(&mut Registry, f32) -> EcsResult<()>>;

struct ScheduledSystem {
    name: &'static str,
    run: SystemFn,
}

/// Named, ordered list of systems.
///
/// ```rust
/// use espacial_core::{Registry, Schedule};
///
/// let mut schedule = Schedule::gameplay();
/// assert_eq!(schedule.names().collect::<Vec<_>>(), ["movement", "invulnerability"]);
///
/// let mut registry = Registry::new();
/// schedule.run(&mut registry, 1.0 / 60.0).unwrap();
/// ```
#[derive(Default)]
pub struct Schedule {
    systems: Vec<ScheduledSystem>,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard gameplay chain: movement, then invulnerability ticking.
    #[must_use]
    pub fn gameplay() -> Self {
        Self::new()
            .with_system("movement", |registry, dt| {
                movement::update(registry, dt);
                Ok(())
            })
            .with_system("invulnerability", |registry, _| {
                health::tick_invulnerability(registry);
                Ok(())
            })
    }

    /// Builder form of [`Schedule::add_system`].
    #[must_use]
    pub fn with_system<F>(mut self, name: &'static str, system: F) -> Self
    where
        F: FnMut(&mut Registry, f32) -> EcsResult<()> + 'static,
    {
        self.add_system(name, system);
        self
    }

    /// Appends a system to the end of the chain.
    pub fn add_system<F>(&mut self, name: &'static str, system: F)
    where
        F: FnMut(&mut Registry, f32) -> EcsResult<()> + 'static,
    {
        tracing::debug!(system = name, position = self.systems.len(), "system scheduled");
        self.systems.push(ScheduledSystem {
            name,
            run: Box::new(system),
        });
    }

    /// Runs every system once, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing system and returns its error; later
    /// systems do not run for this step.
    pub fn run(&mut self, registry: &mut Registry, dt: f32) -> EcsResult<()> {
        for system in &mut self.systems {
            if let Err(err) = (system.run)(registry, dt) {
                tracing::error!(system = system.name, error = %err, "system failed");
                return Err(err);
            }
        }
        Ok(())
    }

    /// Number of scheduled systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// `true` when nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// System names in execution order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.systems.iter().map(|s| s.name)
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Health, Transform, Velocity};
    use crate::ecs::{EcsError, Entity};
    use espacial_shared::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_runs_in_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&log), Rc::clone(&log));

        let mut schedule = Schedule::new()
            .with_system("first", move |_, _| {
                a.borrow_mut().push("first");
                Ok(())
            })
            .with_system("second", move |_, _| {
                b.borrow_mut().push("second");
                Ok(())
            });

        let mut registry = Registry::new();
        schedule.run(&mut registry, 0.0).unwrap();
        schedule.run(&mut registry, 0.0).unwrap();

        assert_eq!(*log.borrow(), ["first", "second", "first", "second"]);
    }

    #[test]
    fn test_later_systems_observe_earlier_effects() {
        let seen = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&seen);

        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Transform::default()).unwrap();
        registry.add(e, Velocity::new(Vec2::new(60.0, 0.0))).unwrap();

        let mut schedule = Schedule::gameplay().with_system("observer", move |registry, _| {
            *sink.borrow_mut() = Some(registry.get::<Transform>(e)?.position.x);
            Ok(())
        });
        schedule.run(&mut registry, 1.0 / 60.0).unwrap();

        let x = seen.borrow().unwrap();
        assert!((x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_error_stops_chain() {
        let reached = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&reached);

        let mut schedule = Schedule::new()
            .with_system("failing", |registry, _| {
                registry.get::<Health>(Entity::NULL).map(|_| ())
            })
            .with_system("after", move |_, _| {
                *flag.borrow_mut() = true;
                Ok(())
            });

        let mut registry = Registry::new();
        let err = schedule.run(&mut registry, 0.0).unwrap_err();

        assert_eq!(err, EcsError::InvalidEntity { entity: Entity::NULL });
        assert!(!*reached.borrow());
    }

    #[test]
    fn test_gameplay_chain() {
        let schedule = Schedule::gameplay();
        assert_eq!(schedule.len(), 2);
        assert!(!schedule.is_empty());
        assert_eq!(format!("{schedule:?}"), r#"["movement", "invulnerability"]"#);
    }
}
