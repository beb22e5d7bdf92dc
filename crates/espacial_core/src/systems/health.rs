//! Per-step bookkeeping for [`Health`].

use crate::components::Health;
use crate::ecs::Registry;

/// Counts every active invulnerability window down by one step.
///
/// # Returns
///
/// Number of entities still invulnerable after the tick.
pub fn tick_invulnerability(registry: &mut Registry) -> usize {
    let Some(store) = registry.storage_mut::<Health>() else {
        return 0;
    };

    let mut remaining = 0;
    for (_, health) in store.iter_mut() {
        if health.is_invulnerable() {
            health.tick_invulnerability();
            if health.is_invulnerable() {
                remaining += 1;
            }
        }
    }
    remaining
}
