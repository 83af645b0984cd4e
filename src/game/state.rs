//! Game State Definitions
//!
//! The session aggregate and the central entity registry.
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::config::GameConfig;
use crate::core::fixed::Fixed;
use crate::core::vec2::FixedVec2;
use crate::core::rng::DeterministicRng;
use crate::core::timer::Countdown;
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::game::bounds::PlaygroundBounds;
use crate::game::events::{DestroyReason, GameEvent};
use crate::game::lives::{LivesState, Scoreboard, STARTING_LIVES};
use crate::game::shield::{ShieldActivation, ShieldTimer};
use crate::game::spawner::{Spawner, ThreatArchetype, ThreatSpawn};

/// Prototype name of the player ship.
pub const PLAYER_PROTOTYPE: &str = "player";
/// Prototype name of explosions.
pub const EXPLOSION_PROTOTYPE: &str = "explosion";
/// Prototype name of player projectiles.
pub const PLAYER_BOLT_PROTOTYPE: &str = "player_bolt";
/// Prototype name of saucer projectiles.
pub const SAUCER_BOLT_PROTOTYPE: &str = "saucer_bolt";

// =============================================================================
// ENTITIES
// =============================================================================

/// Registry key. Monotonic per session, never reused.
pub type EntityId = u32;

/// What an entity is, as far as the rules are concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EntityKind {
    /// The player ship
    Player = 0,
    /// Bolt fired by the player
    PlayerProjectile = 1,
    /// Bolt fired by a saucer
    SaucerProjectile = 2,
    /// Asteroid or asteroid fragment
    Asteroid = 3,
    /// Enemy saucer
    Saucer = 4,
    /// Short-lived visual effect
    Explosion = 5,
}

impl EntityKind {
    /// Asteroids and saucers.
    #[inline]
    pub fn is_threat(self) -> bool {
        matches!(self, EntityKind::Asteroid | EntityKind::Saucer)
    }

    /// Bolts of either side.
    #[inline]
    pub fn is_projectile(self) -> bool {
        matches!(self, EntityKind::PlayerProjectile | EntityKind::SaucerProjectile)
    }
}

/// An entry of the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Registry key
    pub id: EntityId,
    /// Rules category
    pub kind: EntityKind,
    /// Prototype the host instantiated
    pub prototype: String,
    /// Last known position
    pub position: FixedVec2,
    /// Last known facing, in fixed-point degrees
    pub yaw: Fixed,
    /// Velocity given at spawn
    pub velocity: FixedVec2,
    /// Points for destroying it
    pub score: u32,
    /// Fragment archetypes spawned when it breaks
    pub fragments: Vec<String>,
    /// Spawned by a breaking asteroid; never breaks further
    pub is_fragment: bool,
    /// Removes the entity when it fires
    pub lifetime: Countdown,
    /// Saucer weapon timer
    pub fire_timer: Countdown,
}

impl Entity {
    /// Create a plain entity with no score, fragments or timers.
    pub fn new(id: EntityId, kind: EntityKind, prototype: &str, position: FixedVec2, yaw: Fixed) -> Self {
        Self {
            id,
            kind,
            prototype: prototype.to_string(),
            position,
            yaw,
            velocity: FixedVec2::ZERO,
            score: 0,
            fragments: Vec::new(),
            is_fragment: false,
            lifetime: Countdown::stopped(),
            fire_timer: Countdown::stopped(),
        }
    }

    /// Hash entity state for verification.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id);
        hasher.update_u8(self.kind as u8);
        hasher.update_str(&self.prototype);
        hasher.update_vec2(self.position);
        hasher.update_fixed(self.yaw);
        hasher.update_vec2(self.velocity);
        hasher.update_u32(self.score);
        hasher.update_u32(self.fragments.len() as u32);
        for fragment in &self.fragments {
            hasher.update_str(fragment);
        }
        hasher.update_bool(self.is_fragment);
        hasher.update_timer(self.lifetime.remaining());
        hasher.update_timer(self.fire_timer.remaining());
    }
}

/// Player-only state, alongside the ship's registry entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerShip {
    /// Registry key of the ship
    pub entity: EntityId,
    /// Invulnerability window
    pub shield: ShieldTimer,
    /// Ready to fire when not running
    pub weapon: Countdown,
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete state of a session.
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Session identifier
    pub session_id: Uuid,

    /// Current tick
    pub tick: u32,

    /// RNG seed (for verification)
    pub rng_seed: u64,

    /// Deterministic RNG state
    pub rng: DeterministicRng,

    /// Arena half-extents
    pub bounds: PlaygroundBounds,

    /// Every live entity (BTreeMap for deterministic iteration)
    pub entities: BTreeMap<EntityId, Entity>,

    /// Next entity ID (monotonic counter)
    pub next_entity_id: EntityId,

    /// Points earned
    pub score: Scoreboard,

    /// Lives state machine
    pub lives: LivesState,

    /// Current ship, if one is alive
    pub player: Option<PlayerShip>,

    /// Pending respawn
    pub respawn: Countdown,

    /// Asteroid spawner
    pub asteroid_spawner: Spawner,

    /// Saucer spawner
    pub saucer_spawner: Spawner,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session and place the first ship.
    ///
    /// `detected_bounds` are the arena extents reported by the host; the
    /// configured ones are used when it has none.
    pub fn new(session_id: Uuid, config: &GameConfig, detected_bounds: Option<PlaygroundBounds>) -> Self {
        let spawner = &config.spawner;
        let mut state = Self {
            session_id,
            tick: 0,
            rng_seed: config.rng_seed,
            rng: DeterministicRng::new(config.rng_seed),
            bounds: PlaygroundBounds::resolve(detected_bounds, config.bounds),
            entities: BTreeMap::new(),
            next_entity_id: 0,
            score: Scoreboard::new(),
            lives: LivesState::new(),
            player: None,
            respawn: Countdown::stopped(),
            asteroid_spawner: Spawner::new(spawner.warmup_ticks, spawner.asteroid_interval_ticks),
            saucer_spawner: Spawner::new(spawner.warmup_ticks, spawner.saucer_interval_ticks),
            pending_events: Vec::new(),
        };

        state.push_event(GameEvent::session_started(0, STARTING_LIVES));
        state.spawn_player(config);
        state
    }

    /// Put an entity into the registry and announce it.
    pub fn insert_entity(&mut self, mut entity: Entity, muzzle: Option<u8>) -> EntityId {
        let id = self.next_entity_id;
        self.next_entity_id += 1;
        entity.id = id;

        self.push_event(GameEvent::entity_spawned(
            self.tick,
            id,
            entity.kind,
            &entity.prototype,
            entity.position,
            entity.yaw,
            entity.velocity,
            muzzle,
        ));
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity and announce it. `None` if it was already gone.
    pub fn remove_entity(&mut self, id: EntityId, reason: DestroyReason) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        if self.player.is_some_and(|p| p.entity == id) {
            self.player = None;
        }
        self.push_event(GameEvent::entity_destroyed(self.tick, id, entity.kind, reason));
        Some(entity)
    }

    /// Place a new ship at the origin.
    ///
    /// Ships after the first come with their shield already up.
    pub fn spawn_player(&mut self, config: &GameConfig) -> EntityId {
        let ship = Entity::new(0, EntityKind::Player, PLAYER_PROTOTYPE, FixedVec2::ZERO, 0);
        let id = self.insert_entity(ship, None);

        let mut shield = ShieldTimer::new();
        if self.lives.lives() < STARTING_LIVES
            && shield.force_activate(&config.shield) == ShieldActivation::Activated
        {
            self.push_event(GameEvent::shield_activated(self.tick, id, true));
        }

        self.player = Some(PlayerShip {
            entity: id,
            shield,
            weapon: Countdown::start(config.player_weapon.initial_delay_ticks),
        });
        tracing::debug!(tick = self.tick, entity = id, lives = self.lives.lives(), "player spawned");
        id
    }

    /// Put a planned threat into the registry.
    pub fn spawn_threat(
        &mut self,
        kind: EntityKind,
        archetype: &ThreatArchetype,
        spawn: &ThreatSpawn,
        is_fragment: bool,
    ) -> EntityId {
        let mut entity = Entity::new(0, kind, &archetype.name, spawn.position, spawn.yaw);
        entity.velocity = spawn.velocity;
        entity.score = archetype.score;
        entity.is_fragment = is_fragment;
        if !is_fragment {
            entity.fragments = archetype.fragments.clone();
        }
        self.insert_entity(entity, None)
    }

    /// Put an explosion into the registry.
    pub fn spawn_explosion(&mut self, position: FixedVec2, yaw: Fixed, lifetime_ticks: u32) -> EntityId {
        let mut entity = Entity::new(0, EntityKind::Explosion, EXPLOSION_PROTOTYPE, position, yaw);
        entity.lifetime = Countdown::start(lifetime_ticks);
        self.insert_entity(entity, None)
    }

    /// Get an entity by ID.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get an entity mutably by ID.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// The current ship's registry entry.
    pub fn player_entity(&self) -> Option<&Entity> {
        self.player.and_then(|p| self.entities.get(&p.entity))
    }

    /// Is a saucer in the registry?
    pub fn saucer_present(&self) -> bool {
        self.entities.values().any(|e| e.kind == EntityKind::Saucer)
    }

    /// Number of entities of a kind.
    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.entities.values().filter(|e| e.kind == kind).count()
    }

    /// Add points and announce the new total.
    pub fn award_score(&mut self, points: u32) {
        if points == 0 {
            return;
        }
        let total = self.score.award(points);
        self.push_event(GameEvent::score_changed(self.tick, points, total));
    }

    /// Has the session ended?
    pub fn is_game_over(&self) -> bool {
        self.lives.is_game_over()
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.rng_seed, |hasher| {
            let [s0, s1] = self.rng.state();
            hasher.update_u64(s0);
            hasher.update_u64(s1);

            hasher.update_fixed(self.bounds.max_x);
            hasher.update_fixed(self.bounds.max_z);

            // BTreeMap guarantees sorted order
            for entity in self.entities.values() {
                entity.hash_into(hasher);
            }
            hasher.update_u32(self.next_entity_id);

            hasher.update_u32(self.score.points());
            hasher.update_u8(self.lives.lives());
            hasher.update_bool(self.lives.is_game_over());

            match &self.player {
                Some(ship) => {
                    hasher.update_bool(true);
                    hasher.update_u32(ship.entity);
                    hasher.update_u8(ship.shield.phase() as u8);
                    hasher.update_timer(ship.shield.remaining());
                    hasher.update_timer(ship.weapon.remaining());
                }
                None => hasher.update_bool(false),
            }

            hasher.update_timer(self.respawn.remaining());
            hasher.update_timer(self.asteroid_spawner.remaining());
            hasher.update_timer(self.saucer_spawner.remaining());
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::from_int;
    use crate::game::events::GameEventData;

    fn new_state(seed: u64) -> GameState {
        let config = GameConfig {
            rng_seed: seed,
            ..GameConfig::default()
        };
        GameState::new(Uuid::nil(), &config, None)
    }

    #[test]
    fn test_first_ship_at_origin_without_shield() {
        let mut state = new_state(1);
        let ship = state.player.unwrap();
        assert!(!ship.shield.is_active());

        let entity = state.player_entity().unwrap();
        assert_eq!(entity.kind, EntityKind::Player);
        assert_eq!(entity.position, FixedVec2::ZERO);

        let events = state.take_events();
        assert!(matches!(events[0].data, GameEventData::SessionStarted { lives: 3 }));
        assert!(matches!(
            &events[1].data,
            GameEventData::EntitySpawned { kind: EntityKind::Player, prototype, .. } if prototype == PLAYER_PROTOTYPE
        ));
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_later_ships_shielded() {
        let config = GameConfig::default();
        let mut state = GameState::new(Uuid::nil(), &config, None);
        let first = state.player.unwrap().entity;
        state.remove_entity(first, DestroyReason::Collision);
        assert!(state.player.is_none());

        state.lives.on_player_death();
        state.spawn_player(&config);
        assert!(state.player.unwrap().shield.is_active());
    }

    #[test]
    fn test_ids_monotonic_and_removal_once() {
        let mut state = new_state(2);
        let a = state.spawn_explosion(FixedVec2::ZERO, 0, 10);
        let b = state.spawn_explosion(FixedVec2::ZERO, 0, 10);
        assert!(b > a);

        assert!(state.remove_entity(a, DestroyReason::Expired).is_some());
        assert!(state.remove_entity(a, DestroyReason::Expired).is_none());

        let c = state.spawn_explosion(FixedVec2::ZERO, 0, 10);
        assert!(c > b);
    }

    #[test]
    fn test_fragments_never_carry_fragments() {
        let mut state = new_state(3);
        let archetype = ThreatArchetype::new("rock", 10, from_int(1))
            .with_fragments(["fragment_01", "fragment_02"]);
        let spawn = ThreatSpawn {
            archetype: "rock".to_string(),
            position: FixedVec2::ZERO,
            yaw: 0,
            velocity: FixedVec2::ZERO,
        };

        let parent = state.spawn_threat(EntityKind::Asteroid, &archetype, &spawn, false);
        let child = state.spawn_threat(EntityKind::Asteroid, &archetype, &spawn, true);
        assert_eq!(state.entity(parent).unwrap().fragments.len(), 2);
        assert!(state.entity(child).unwrap().fragments.is_empty());
    }

    #[test]
    fn test_hash_covers_fragment_list() {
        let spawn = ThreatSpawn {
            archetype: "rock".to_string(),
            position: FixedVec2::ZERO,
            yaw: 0,
            velocity: FixedVec2::ZERO,
        };
        let hash_with = |fragments: &[&str]| {
            let mut state = new_state(5);
            let archetype = ThreatArchetype::new("rock", 10, from_int(1)).with_fragments(fragments.iter().copied());
            state.spawn_threat(EntityKind::Asteroid, &archetype, &spawn, false);
            state.compute_hash()
        };

        let two = hash_with(&["fragment_01", "fragment_02"]);
        assert_eq!(two, hash_with(&["fragment_01", "fragment_02"]));
        assert_ne!(two, hash_with(&["fragment_01"]));
        assert_ne!(two, hash_with(&["fragment_02", "fragment_01"]));
        assert_ne!(two, hash_with(&[]));
    }

    #[test]
    fn test_score_event_only_when_nonzero() {
        let mut state = new_state(4);
        state.take_events();
        state.award_score(0);
        assert!(state.take_events().is_empty());
        state.award_score(20);
        state.award_score(50);
        assert_eq!(state.score.points(), 70);
        let events = state.take_events();
        assert!(matches!(events[1].data, GameEventData::ScoreChanged { awarded: 50, total: 70 }));
    }

    #[test]
    fn test_detected_bounds_win() {
        let config = GameConfig::default();
        let detected = PlaygroundBounds::new(from_int(40), from_int(30));
        let state = GameState::new(Uuid::nil(), &config, Some(detected));
        assert_eq!(state.bounds, detected);
    }

    #[test]
    fn test_state_determinism() {
        let state1 = new_state(12345);
        let state2 = new_state(12345);
        assert_eq!(state1.compute_hash(), state2.compute_hash());

        let state3 = new_state(54321);
        assert_ne!(state1.compute_hash(), state3.compute_hash());
    }
}
