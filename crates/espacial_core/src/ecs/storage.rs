//! # Component Storage
//!
//! Dense, per-type component storage with entity-indexed lookup.
//!
//! Each store is a sparse set:
//! - `sparse` maps an entity index to a position in the dense arrays
//! - `entities` and `data` are packed, so iteration is contiguous memory
//! - Removal swaps the last element into the hole, keeping insert, lookup,
//!   remove and contains O(1)

use std::any::Any;

use bytemuck::Pod;

use super::component::Component;
use super::entity::Entity;

/// Storage for a single component type.
///
/// Iteration order is the dense order: insertion order, perturbed only by
/// swap-removal. It does not change unless the store is structurally
/// modified, so it is stable within a frame.
///
/// Structural changes are crate-private. Outside callers reach a store
/// through [`Registry::storage`](super::Registry::storage) and
/// [`Registry::storage_mut`](super::Registry::storage_mut), which can read
/// and mutate values but never attach or detach them.
///
/// # Example
///
/// ```rust
/// use espacial_core::{Registry, Transform};
///
/// let mut registry = Registry::new();
/// let e = registry.create();
/// registry.add(e, Transform::default()).unwrap();
///
/// for (_, t) in registry.storage_mut::<Transform>().unwrap().iter_mut() {
///     t.position.x += 1.0;
/// }
/// assert_eq!(registry.get::<Transform>(e).unwrap().position.x, 1.0);
/// ```
pub struct ComponentStorage<C: Component> {
    /// Entity index -> dense position.
    sparse: Vec<Option<u32>>,
    /// Owner of each dense slot.
    entities: Vec<Entity>,
    /// The dense array of components.
    data: Vec<C>,
}

impl<C: Component> ComponentStorage<C> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sparse: Vec::new(),
            entities: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Creates an empty store with room for `capacity` components.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sparse: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity),
        }
    }

    /// Number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no entity holds this component.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn dense_index(&self, entity: Entity) -> Option<usize> {
        let pos = (*self.sparse.get(entity.index() as usize)?)? as usize;
        (self.entities.get(pos) == Some(&entity)).then_some(pos)
    }

    /// Returns `true` if `entity` holds a component in this store.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.dense_index(entity).is_some()
    }

    /// Stores `component` for `entity`, replacing any previous value.
    ///
    /// Returns a mutable reference to the stored value. The reference is
    /// only valid until the store is next modified.
    pub(crate) fn insert(&mut self, entity: Entity, component: C) -> &mut C {
        let idx = entity.index() as usize;
        if idx >= self.sparse.len() {
            self.sparse.resize(idx + 1, None);
        }

        if let Some(pos) = self.sparse[idx] {
            let pos = pos as usize;
            self.entities[pos] = entity;
            self.data[pos] = component;
            return &mut self.data[pos];
        }

        let pos = self.data.len();
        self.sparse[idx] = Some(pos as u32);
        self.entities.push(entity);
        self.data.push(component);
        &mut self.data[pos]
    }

    /// Gets the component of `entity`.
    #[inline]
    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&C> {
        self.dense_index(entity).map(|pos| &self.data[pos])
    }

    /// Gets the component of `entity` mutably.
    #[inline]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut C> {
        self.dense_index(entity).map(move |pos| &mut self.data[pos])
    }

    /// Removes and returns the component of `entity`, if any.
    pub(crate) fn remove(&mut self, entity: Entity) -> Option<C> {
        let pos = self.dense_index(entity)?;
        self.sparse[entity.index() as usize] = None;

        let removed = self.data.swap_remove(pos);
        self.entities.swap_remove(pos);

        // The former last element now lives at `pos`
        if let Some(moved) = self.entities.get(pos) {
            self.sparse[moved.index() as usize] = Some(pos as u32);
        }

        Some(removed)
    }

    /// Entities holding this component, in dense order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Components in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// Iterates over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.entities.iter().copied().zip(self.data.iter())
    }

    /// Iterates mutably over `(entity, component)` pairs in dense order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.entities.iter().copied().zip(self.data.iter_mut())
    }

    /// Removes every component. Capacity is kept.
    pub(crate) fn clear(&mut self) {
        self.sparse.clear();
        self.entities.clear();
        self.data.clear();
    }
}

impl<C: Component + Pod> ComponentStorage<C> {
    /// The dense component array as raw bytes.
    ///
    /// Two stores built by the same sequence of operations compare equal
    /// byte-for-byte, which makes this suitable for determinism checks and
    /// replication snapshots.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

impl<C: Component> Default for ComponentStorage<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a [`ComponentStorage`], so the registry can hold
/// stores of every component type in one map.
pub(crate) trait AnyStorage: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn remove_entity(&mut self, entity: Entity) -> bool;
    fn len(&self) -> usize;
    fn clear(&mut self);
    fn component_name(&self) -> &'static str;
}

impl<C: Component> AnyStorage for ComponentStorage<C> {
    fn as_any(&self) -> &dyn Any {
        self as &dyn Any
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self as &mut dyn Any
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        ComponentStorage::clear(self);
    }

    fn component_name(&self) -> &'static str {
        C::NAME
    }
}
