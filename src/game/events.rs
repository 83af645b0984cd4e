//! Game Events
//!
//! Everything the host needs to mirror the registry and update the HUD.
//! Events are pushed in the order they happen within a tick.

use serde::{Serialize, Deserialize};

use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::game::state::{EntityId, EntityKind};

/// Why an entity left the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyReason {
    /// Destroyed by a contact rule
    Collision,
    /// Crossed the outer destroy boundary
    LeftArena,
    /// Lifetime ran out
    Expired,
    /// Swept when the session ended
    GameOver,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Session created
    SessionStarted {
        lives: u8,
    },

    /// Entity added to the registry; the host should instantiate `prototype`
    EntitySpawned {
        entity: EntityId,
        kind: EntityKind,
        prototype: String,
        position: FixedVec2,
        yaw: Fixed,
        velocity: FixedVec2,
        /// Muzzle slot on the shooter for projectiles
        muzzle: Option<u8>,
    },

    /// Entity removed from the registry
    EntityDestroyed {
        entity: EntityId,
        kind: EntityKind,
        reason: DestroyReason,
    },

    /// Player teleported across the arena
    PlayerWrapped {
        entity: EntityId,
        position: FixedVec2,
    },

    /// Points awarded
    ScoreChanged {
        awarded: u32,
        total: u32,
    },

    /// Player ship destroyed and a life lost
    PlayerDied {
        entity: EntityId,
        hidden_indicator: u8,
        lives_left: u8,
    },

    /// Lethal contact while the shield was up
    DeathAbsorbed {
        entity: EntityId,
    },

    /// Shield went up
    ShieldActivated {
        entity: EntityId,
        automatic: bool,
    },

    /// Shield went down, cooldown started
    ShieldExpired {
        entity: EntityId,
    },

    /// Cooldown ended
    ShieldRecharged {
        entity: EntityId,
    },

    /// Last life lost
    GameOver {
        final_score: u32,
    },
}

/// A game event stamped with its tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Entity the event is about, if any
    pub entity: Option<EntityId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Stamp `data` with `tick`, pulling out the entity it concerns.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        let entity = match &data {
            GameEventData::EntitySpawned { entity, .. }
            | GameEventData::EntityDestroyed { entity, .. }
            | GameEventData::PlayerWrapped { entity, .. }
            | GameEventData::PlayerDied { entity, .. }
            | GameEventData::DeathAbsorbed { entity }
            | GameEventData::ShieldActivated { entity, .. }
            | GameEventData::ShieldExpired { entity }
            | GameEventData::ShieldRecharged { entity } => Some(*entity),
            _ => None,
        };

        Self {
            tick,
            entity,
            data,
        }
    }

    /// Create session started event.
    pub fn session_started(tick: u32, lives: u8) -> Self {
        Self::new(tick, GameEventData::SessionStarted { lives })
    }

    /// Create entity spawned event.
    #[allow(clippy::too_many_arguments)]
    pub fn entity_spawned(
        tick: u32,
        entity: EntityId,
        kind: EntityKind,
        prototype: &str,
        position: FixedVec2,
        yaw: Fixed,
        velocity: FixedVec2,
        muzzle: Option<u8>,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::EntitySpawned {
                entity,
                kind,
                prototype: prototype.to_string(),
                position,
                yaw,
                velocity,
                muzzle,
            },
        )
    }

    /// Create entity destroyed event.
    pub fn entity_destroyed(tick: u32, entity: EntityId, kind: EntityKind, reason: DestroyReason) -> Self {
        Self::new(tick, GameEventData::EntityDestroyed { entity, kind, reason })
    }

    /// Create player wrapped event.
    pub fn player_wrapped(tick: u32, entity: EntityId, position: FixedVec2) -> Self {
        Self::new(tick, GameEventData::PlayerWrapped { entity, position })
    }

    /// Create score changed event.
    pub fn score_changed(tick: u32, awarded: u32, total: u32) -> Self {
        Self::new(tick, GameEventData::ScoreChanged { awarded, total })
    }

    /// Create player died event.
    pub fn player_died(tick: u32, entity: EntityId, hidden_indicator: u8, lives_left: u8) -> Self {
        Self::new(
            tick,
            GameEventData::PlayerDied {
                entity,
                hidden_indicator,
                lives_left,
            },
        )
    }

    /// Create death absorbed event.
    pub fn death_absorbed(tick: u32, entity: EntityId) -> Self {
        Self::new(tick, GameEventData::DeathAbsorbed { entity })
    }

    /// Create shield activated event.
    pub fn shield_activated(tick: u32, entity: EntityId, automatic: bool) -> Self {
        Self::new(
            tick,
            GameEventData::ShieldActivated { entity, automatic },
        )
    }

    /// Create shield expired event.
    pub fn shield_expired(tick: u32, entity: EntityId) -> Self {
        Self::new(tick, GameEventData::ShieldExpired { entity })
    }

    /// Create shield recharged event.
    pub fn shield_recharged(tick: u32, entity: EntityId) -> Self {
        Self::new(tick, GameEventData::ShieldRecharged { entity })
    }

    /// Create game over event.
    pub fn game_over(tick: u32, final_score: u32) -> Self {
        Self::new(tick, GameEventData::GameOver { final_score })
    }
}
