//! # Entity Registry
//!
//! The single owner of entity identity and of every component store.
//! Everything else reaches entities through a `&Registry` or `&mut Registry`
//! passed down the call chain; there is no global registry.

use std::any::TypeId;
use std::collections::HashMap;

use bytemuck::Pod;

use super::component::Component;
use super::entity::{Entity, EntitySlot};
use super::error::{EcsError, EcsResult};
use super::storage::{AnyStorage, ComponentStorage};
use super::view::{ComponentSet, View};

/// Snapshot of registry counters, for debugging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Currently valid entities.
    pub alive: usize,
    /// Entities ever created.
    pub created_total: u64,
    /// Valid entities carrying a debug name.
    pub named: usize,
    /// Component types that have a store.
    pub component_types: usize,
}

/// The entity registry - container for all simulation state.
///
/// Entity slots are recycled through a free list. Every reuse hands out a
/// new generation, so identifiers captured before a destroy never alias the
/// next occupant of the slot.
///
/// # Example
///
/// ```rust
/// use espacial_core::{Registry, Transform, Velocity, Vec2};
///
/// let mut registry = Registry::new();
/// let player = registry.create_named("player");
/// registry.add(player, Transform::new(Vec2::new(100.0, 200.0))).unwrap();
/// registry.add(player, Velocity::new(Vec2::new(50.0, 0.0))).unwrap();
///
/// assert!(registry.has::<Transform>(player));
/// assert_eq!(registry.count(), 1);
/// ```
pub struct Registry {
    /// Allocation table, indexed by `Entity::index`.
    slots: Vec<EntitySlot>,
    /// Free slot indices for reuse.
    free_indices: Vec<u32>,
    /// Number of currently alive entities.
    alive_count: usize,
    /// Entities ever created, for diagnostics.
    created_total: u64,
    /// Debug names of named entities.
    names: HashMap<Entity, String>,
    /// One store per component type.
    stores: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty registry with room for `capacity` entities before
    /// the allocation table grows.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_indices: Vec::new(),
            alive_count: 0,
            created_total: 0,
            names: HashMap::new(),
            stores: HashMap::new(),
        }
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates a new entity, reusing a freed slot when one is available.
    pub fn create(&mut self) -> Entity {
        let entity = self.allocate();
        tracing::trace!(%entity, "entity created");
        entity
    }

    /// Creates a new entity carrying a debug name.
    pub fn create_named(&mut self, name: impl Into<String>) -> Entity {
        let entity = self.allocate();
        let name = name.into();
        tracing::debug!(%entity, name = %name, "entity created");
        self.names.insert(entity, name);
        entity
    }

    fn allocate(&mut self) -> Entity {
        self.alive_count += 1;
        self.created_total += 1;

        if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            return Entity::new(index, slot.generation);
        }

        let index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        assert!(index < u32::MAX, "entity table exhausted");
        self.slots.push(EntitySlot {
            generation: 0,
            alive: true,
        });
        Entity::new(index, 0)
    }

    /// Destroys an entity and every component attached to it.
    ///
    /// Destroying an invalid or already destroyed entity is a no-op that
    /// emits a warning.
    ///
    /// # Returns
    ///
    /// `true` if the entity was destroyed.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.is_valid(entity) {
            tracing::warn!(%entity, "attempted to destroy an invalid entity");
            return false;
        }

        for store in self.stores.values_mut() {
            store.remove_entity(entity);
        }

        match self.names.remove(&entity) {
            Some(name) => tracing::debug!(%entity, name = %name, "entity destroyed"),
            None => tracing::trace!(%entity, "entity destroyed"),
        }

        self.release(entity.index());
        true
    }

    /// Marks a slot dead, bumps its generation and frees it.
    fn release(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        slot.alive = false;
        self.alive_count -= 1;

        // A slot whose generation would wrap is retired instead of reused,
        // so an identifier can never come back to life.
        if slot.generation == u32::MAX {
            return;
        }
        slot.generation += 1;
        self.free_indices.push(index);
    }

    /// Checks whether an entity is alive: its index is in the table and its
    /// generation matches the slot's current generation.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, entity: Entity) -> bool {
        !entity.is_null()
            && self
                .slots
                .get(entity.index() as usize)
                .is_some_and(|slot| slot.matches(entity))
    }

    /// Destroys all entities and empties every store.
    ///
    /// All outstanding identifiers become invalid.
    pub fn clear(&mut self) {
        let destroyed = self.alive_count;

        for store in self.stores.values_mut() {
            store.clear();
        }
        self.names.clear();

        for index in 0..self.slots.len() {
            if self.slots[index].alive {
                self.release(index as u32);
            }
        }

        tracing::info!(destroyed, "registry cleared");
    }

    /// Number of currently valid entities.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.alive_count
    }

    /// Debug name of an entity, if it was created with one.
    #[must_use]
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.names.get(&entity).map(String::as_str)
    }

    /// Iterates over all valid entities in slot order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(index, slot)| Entity::new(index as u32, slot.generation))
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches `component` to `entity`, replacing any previous value of the
    /// same type.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] if the entity is not valid.
    pub fn add<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<&mut C> {
        if !self.is_valid(entity) {
            tracing::error!(%entity, component = C::NAME, "cannot add component to invalid entity");
            return Err(EcsError::InvalidEntity { entity });
        }

        tracing::trace!(%entity, component = C::NAME, "component added");
        Ok(self.storage_or_insert::<C>().insert(entity, component))
    }

    /// Gets a component of `entity`.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] if the entity is not valid,
    /// [`EcsError::MissingComponent`] if it does not hold `C`.
    pub fn get<C: Component>(&self, entity: Entity) -> EcsResult<&C> {
        if !self.is_valid(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        self.storage::<C>()
            .and_then(|store| store.get(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: C::NAME,
            })
    }

    /// Gets a component of `entity` mutably.
    ///
    /// # Errors
    ///
    /// Same as [`Registry::get`].
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> EcsResult<&mut C> {
        if !self.is_valid(entity) {
            return Err(EcsError::InvalidEntity { entity });
        }
        self.storage_mut::<C>()
            .and_then(|store| store.get_mut(entity))
            .ok_or(EcsError::MissingComponent {
                entity,
                component: C::NAME,
            })
    }

    /// Gets a component of `entity`, or `None` if the entity is invalid or
    /// lacks it.
    #[must_use]
    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.storage::<C>()?.get(entity)
    }

    /// Checks whether `entity` holds a `C`.
    #[inline]
    #[must_use]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.storage::<C>().is_some_and(|store| store.contains(entity))
    }

    /// Detaches a `C` from `entity`. No-op if it has none.
    ///
    /// # Returns
    ///
    /// The removed component, if there was one.
    pub fn remove<C: Component>(&mut self, entity: Entity) -> Option<C> {
        let removed = self.storage_mut::<C>()?.remove(entity);
        if removed.is_some() {
            tracing::trace!(%entity, component = C::NAME, "component removed");
        }
        removed
    }

    /// Number of entities holding a `C`.
    #[must_use]
    pub fn component_count<C: Component>(&self) -> usize {
        self.storage::<C>().map_or(0, ComponentStorage::len)
    }

    /// Snapshot of the entities holding every component in `Q`.
    ///
    /// ```rust
    /// use espacial_core::{Registry, Transform, Velocity};
    ///
    /// let mut registry = Registry::new();
    /// let mover = registry.create();
    /// registry.add(mover, Transform::default()).unwrap();
    /// registry.add(mover, Velocity::default()).unwrap();
    /// let still = registry.create();
    /// registry.add(still, Transform::default()).unwrap();
    ///
    /// let view = registry.view::<(Transform, Velocity)>();
    /// assert_eq!(view.as_slice(), &[mover]);
    /// ```
    #[must_use]
    pub fn view<Q: ComponentSet>(&self) -> View<Q> {
        View::snapshot(self)
    }

    /// Runs `f` on every entity holding both an `A` and a `B`, with mutable
    /// access to `A` and shared access to `B`.
    ///
    /// Iteration follows the dense order of the `A` store.
    ///
    /// # Returns
    ///
    /// The number of entities visited.
    ///
    /// # Panics
    ///
    /// Panics if `A` and `B` are the same type.
    pub fn for_each_pair<A, B, F>(&mut self, mut f: F) -> usize
    where
        A: Component,
        B: Component,
        F: FnMut(Entity, &mut A, &B),
    {
        let key = TypeId::of::<A>();
        assert_ne!(key, TypeId::of::<B>(), "for_each_pair needs two distinct component types");

        // Lift the `A` store out of the map so `B` can be borrowed alongside it
        let Some(mut lifted) = self.stores.remove(&key) else {
            return 0;
        };

        let mut visited = 0;
        if let (Some(a_store), Some(b_store)) = (
            lifted.as_any_mut().downcast_mut::<ComponentStorage<A>>(),
            self.storage::<B>(),
        ) {
            for (entity, a) in a_store.iter_mut() {
                if let Some(b) = b_store.get(entity) {
                    f(entity, a, b);
                    visited += 1;
                }
            }
        }

        self.stores.insert(key, lifted);
        visited
    }

    /// The store for `C`, if one has been created.
    #[must_use]
    pub fn storage<C: Component>(&self) -> Option<&ComponentStorage<C>> {
        self.stores
            .get(&TypeId::of::<C>())
            .and_then(|store| store.as_any().downcast_ref::<ComponentStorage<C>>())
    }

    /// The store for `C` mutably, if one has been created.
    ///
    /// Values can be mutated in place. Attaching or detaching components
    /// goes through [`Registry::add`] and [`Registry::remove`], so a store
    /// never holds an entity the registry has destroyed:
    ///
    /// ```compile_fail
    /// use espacial_core::{Health, Registry};
    ///
    /// let mut registry = Registry::new();
    /// let e = registry.create();
    /// registry.add(e, Health::new(10)).unwrap();
    /// registry.destroy(e);
    /// registry.storage_mut::<Health>().unwrap().insert(e, Health::new(5));
    /// ```
    pub fn storage_mut<C: Component>(&mut self) -> Option<&mut ComponentStorage<C>> {
        self.stores
            .get_mut(&TypeId::of::<C>())
            .and_then(|store| store.as_any_mut().downcast_mut::<ComponentStorage<C>>())
    }

    fn storage_or_insert<C: Component>(&mut self) -> &mut ComponentStorage<C> {
        let store = self
            .stores
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Box::new(ComponentStorage::<C>::new()));

        match store.as_any_mut().downcast_mut::<ComponentStorage<C>>() {
            Some(store) => store,
            None => unreachable!("store registered under the TypeId of another component"),
        }
    }

    /// Raw bytes of every `C`, in dense order. Empty if no entity holds one.
    #[must_use]
    pub fn component_bytes<C: Component + Pod>(&self) -> &[u8] {
        self.storage::<C>()
            .map_or(&[] as &[u8], ComponentStorage::as_bytes)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Returns the registry counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            alive: self.alive_count,
            created_total: self.created_total,
            named: self.names.len(),
            component_types: self.stores.len(),
        }
    }

    /// Logs the registry counters and per-store sizes at `info` level.
    pub fn log_stats(&self) {
        let stats = self.stats();
        tracing::info!(
            alive = stats.alive,
            created_total = stats.created_total,
            named = stats.named,
            component_types = stats.component_types,
            "registry stats"
        );
        for store in self.stores.values() {
            tracing::info!(component = store.component_name(), count = store.len(), "  store");
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        tracing::debug!(alive = self.alive_count, "registry dropped");
    }
}
