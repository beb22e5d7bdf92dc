//! # Views
//!
//! A view is the set of entities holding every component of a tuple of
//! types, e.g. `(Transform, Velocity)`.
//!
//! The set is snapshotted when the view is created. Iterating a view never
//! observes structural changes made afterwards, so callers may create or
//! destroy entities and add or remove components while walking it. An
//! entity destroyed after the snapshot is still yielded; check
//! [`Registry::is_valid`] or [`Registry::has`] when that matters.

use std::iter::Copied;
use std::marker::PhantomData;
use std::slice;

use super::component::Component;
use super::entity::Entity;
use super::registry::Registry;

/// A tuple of component types that can be queried together.
///
/// Implemented for tuples of one to four [`Component`] types.
pub trait ComponentSet: 'static {
    /// Whether `entity` holds every component in the set.
    fn contains(registry: &Registry, entity: Entity) -> bool;

    /// The entity list of the smallest store in the set, or `None` if any
    /// store in the set has never been created.
    fn candidates(registry: &Registry) -> Option<&[Entity]>;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            fn contains(registry: &Registry, entity: Entity) -> bool {
                $(registry.has::<$name>(entity))&&+
            }

            fn candidates(registry: &Registry) -> Option<&[Entity]> {
                let lists = [$(registry.storage::<$name>()?.entities()),+];
                lists.into_iter().min_by_key(|list| list.len())
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);

/// Snapshot of the entities matching a [`ComponentSet`].
///
/// Finite and restartable: [`View::iter`] can be called any number of times
/// and always yields the same sequence.
pub struct View<Q> {
    entities: Vec<Entity>,
    _query: PhantomData<fn() -> Q>,
}

impl<Q: ComponentSet> View<Q> {
    /// Collects the matching entities, driving the scan from the smallest
    /// store in the set.
    pub(crate) fn snapshot(registry: &Registry) -> Self {
        let entities = Q::candidates(registry)
            .map(|candidates| {
                candidates
                    .iter()
                    .copied()
                    .filter(|&entity| Q::contains(registry, entity))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            entities,
            _query: PhantomData,
        }
    }
}

impl<Q> View<Q> {
    /// Iterates over the snapshotted entities.
    #[must_use]
    pub fn iter(&self) -> Copied<slice::Iter<'_, Entity>> {
        self.entities.iter().copied()
    }

    /// Number of matching entities at snapshot time.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `entity` matched at snapshot time.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// The snapshotted entities.
    #[must_use]
    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }
}

impl<'a, Q> IntoIterator for &'a View<Q> {
    type Item = Entity;
    type IntoIter = Copied<slice::Iter<'a, Entity>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<Q> IntoIterator for View<Q> {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}
