//! # Entity Management
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the registry's slot table
//! - A generation counter for safe reuse

use std::fmt;

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: Index into the slot table
/// - Upper 32 bits: Generation counter for detecting stale references
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Creates a new entity ID from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - The slot index (0 to 2^32-1)
    /// * `generation` - The generation counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the packed 64-bit representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Null/invalid entity ID. Never handed out by a registry.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Entity(null)")
        } else {
            write!(f, "Entity({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// One row of the registry's allocation table.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct EntitySlot {
    /// Generation handed to the current (or next) occupant.
    pub(crate) generation: u32,
    /// Whether this slot is currently occupied.
    pub(crate) alive: bool,
}

impl EntitySlot {
    /// Whether `entity` names the current occupant of this slot.
    #[inline]
    pub(crate) const fn matches(self, entity: Entity) -> bool {
        self.alive && self.generation == entity.generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = Entity::new(12345, 67890);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 67890);
    }

    #[test]
    fn test_null_entity() {
        assert!(Entity::NULL.is_null());
        assert!(Entity::default().is_null());
        assert!(!Entity::new(0, 0).is_null());
    }

    #[test]
    fn test_slot_matches_generation() {
        let slot = EntitySlot {
            generation: 3,
            alive: true,
        };
        assert!(slot.matches(Entity::new(7, 3)));
        assert!(!slot.matches(Entity::new(7, 2)));

        let dead = EntitySlot {
            generation: 3,
            alive: false,
        };
        assert!(!dead.matches(Entity::new(7, 3)));
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Entity::new(4, 1)), "Entity(4v1)");
        assert_eq!(format!("{:?}", Entity::NULL), "Entity(null)");
    }
}
