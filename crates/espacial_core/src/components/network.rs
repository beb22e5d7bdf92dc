//! Replication tag for entities synchronized in multiplayer sessions.
//!
//! The core only stores this tag; the replication itself lives outside the
//! simulation kernel.

use crate::ecs::Component;

/// Network identity and authority of a replicated entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NetworkEntity {
    /// Server-assigned id, identical on every peer.
    pub network_id: u32,
    /// Owning peer (0 = server, 1+ = clients).
    pub owner_id: u32,
    /// Whether this peer may modify the entity and must send updates.
    pub has_authority: bool,
    /// Timestamp (ms) of the last update received, for interpolation.
    pub last_update_time: u64,
    /// NPCs, pickups and other server-driven objects.
    pub server_controlled: bool,
}

impl Component for NetworkEntity {
    const NAME: &'static str = "NetworkEntity";
}

impl NetworkEntity {
    /// Tag for a replicated entity.
    #[must_use]
    pub const fn new(network_id: u32, owner_id: u32, has_authority: bool) -> Self {
        Self {
            network_id,
            owner_id,
            has_authority,
            last_update_time: 0,
            server_controlled: false,
        }
    }

    /// Owned and driven by `local_player`.
    #[must_use]
    pub const fn is_local(&self, local_player: u32) -> bool {
        self.owner_id == local_player && self.has_authority
    }

    /// Owned by some other peer.
    #[must_use]
    pub const fn is_remote(&self, local_player: u32) -> bool {
        self.owner_id != local_player
    }

    /// Whether this peer is responsible for broadcasting the entity.
    #[must_use]
    pub const fn should_send_updates(&self) -> bool {
        self.has_authority
    }

    /// Records the arrival time of an update.
    pub fn update_timestamp(&mut self, timestamp_ms: u64) {
        self.last_update_time = timestamp_ms;
    }
}
