//! Collision Response
//!
//! Pure rules that turn a reported contact into a list of effects. The
//! rules never touch the registry; the tick applies the effects in order.
//!
//! The host reports both sides of every contact. Each pair has exactly one
//! owning side that produces effects; the mirrored report yields nothing.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, FRAGMENT_DISPLACEMENT};
use crate::core::vec2::FixedVec2;
use crate::game::state::{Entity, EntityId, EntityKind};

/// A single consequence of a contact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Explosion at a point
    SpawnExplosion {
        /// Where
        position: FixedVec2,
        /// Facing
        yaw: Fixed,
    },
    /// Fragment threat of the named archetype
    SpawnFragment {
        /// Fragment archetype name
        archetype: String,
        /// Where
        position: FixedVec2,
        /// Facing, inherited from the parent
        yaw: Fixed,
    },
    /// Move a threat along Z
    DisplaceThreat {
        /// Threat to move
        entity: EntityId,
        /// Z offset
        offset_z: Fixed,
    },
    /// Add points
    AwardScore(u32),
    /// Player ship takes a lethal hit (absorbed by an active shield)
    KillPlayer(EntityId),
    /// Remove from the registry
    DestroyEntity(EntityId),
}

/// Dispatch a contact to the rule owned by `this`.
pub fn resolve_contact(this: &Entity, other: &Entity) -> Vec<Effect> {
    match this.kind {
        EntityKind::Asteroid | EntityKind::Saucer => threat_contact(this, other),
        EntityKind::Player => player_contact(this, other),
        EntityKind::PlayerProjectile => projectile_contact(this, other),
        EntityKind::SaucerProjectile | EntityKind::Explosion => Vec::new(),
    }
}

/// Threat side of a contact.
///
/// Asteroids react to the player and player bolts; saucers only to player
/// bolts. The saucer-vs-player case belongs to [`player_contact`].
pub fn threat_contact(threat: &Entity, other: &Entity) -> Vec<Effect> {
    let reacts = match threat.kind {
        EntityKind::Asteroid => matches!(other.kind, EntityKind::Player | EntityKind::PlayerProjectile),
        EntityKind::Saucer => other.kind == EntityKind::PlayerProjectile,
        _ => false,
    };
    if !reacts {
        return Vec::new();
    }

    let mut effects = vec![Effect::SpawnExplosion {
        position: threat.position,
        yaw: threat.yaw,
    }];

    if threat.kind == EntityKind::Asteroid {
        effects.extend(fragment_effects(threat));
    }

    if threat.score > 0 {
        effects.push(Effect::AwardScore(threat.score));
    }

    match other.kind {
        EntityKind::Player => effects.push(Effect::KillPlayer(other.id)),
        EntityKind::PlayerProjectile => effects.push(Effect::DestroyEntity(other.id)),
        _ => {}
    }

    effects.push(Effect::DestroyEntity(threat.id));
    effects
}

/// Two fragments at the parent's position, the parent nudged +Z then -Z
/// between them. A single-entry list is used for both fragments.
fn fragment_effects(asteroid: &Entity) -> Vec<Effect> {
    if asteroid.is_fragment {
        return Vec::new();
    }
    let (first, second) = match asteroid.fragments.as_slice() {
        [] => return Vec::new(),
        [only] => (only, only),
        [first, second, ..] => (first, second),
    };

    let origin = asteroid.position;
    vec![
        Effect::SpawnFragment {
            archetype: first.clone(),
            position: origin,
            yaw: asteroid.yaw,
        },
        Effect::DisplaceThreat {
            entity: asteroid.id,
            offset_z: FRAGMENT_DISPLACEMENT,
        },
        Effect::SpawnFragment {
            archetype: second.clone(),
            position: origin,
            yaw: asteroid.yaw,
        },
        Effect::DisplaceThreat {
            entity: asteroid.id,
            offset_z: -FRAGMENT_DISPLACEMENT,
        },
    ]
}

/// Player side of a contact.
///
/// Ramming a saucer destroys it (and still counts for score); a saucer bolt
/// is consumed. Both are lethal to the ship.
pub fn player_contact(player: &Entity, other: &Entity) -> Vec<Effect> {
    match other.kind {
        EntityKind::Saucer => {
            let mut effects = vec![Effect::SpawnExplosion {
                position: other.position,
                yaw: other.yaw,
            }];
            if other.score > 0 {
                effects.push(Effect::AwardScore(other.score));
            }
            effects.push(Effect::DestroyEntity(other.id));
            effects.push(Effect::KillPlayer(player.id));
            effects
        }
        EntityKind::SaucerProjectile => vec![
            Effect::DestroyEntity(other.id),
            Effect::KillPlayer(player.id),
        ],
        _ => Vec::new(),
    }
}

/// Player bolt side of a contact: bolts cancel each other out.
pub fn projectile_contact(bolt: &Entity, other: &Entity) -> Vec<Effect> {
    if other.kind != EntityKind::SaucerProjectile {
        return Vec::new();
    }
    vec![
        Effect::SpawnExplosion {
            position: bolt.position,
            yaw: bolt.yaw,
        },
        Effect::DestroyEntity(other.id),
        Effect::DestroyEntity(bolt.id),
    ]
}
