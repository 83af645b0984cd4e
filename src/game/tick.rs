//! Authoritative Simulation Tick
//!
//! One call per frame. The host reports what its physics saw (transforms,
//! boundary crossings, contacts) and which buttons were held; the tick
//! applies the rules and returns the events the host must mirror.

use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::fixed::Fixed;
use crate::core::timer::{millis_to_ticks, Countdown};
use crate::core::vec2::FixedVec2;
use crate::game::bounds::teleport;
use crate::game::collision::{resolve_contact, Effect};
use crate::game::events::{DestroyReason, GameEvent};
use crate::game::input::{InputFrame, SessionRecording};
use crate::game::lives::DeathOutcome;
use crate::game::shield::{ShieldActivation, ShieldTransition};
use crate::game::spawner::{drift_velocity, plan_asteroid, plan_saucer, ThreatSpawn};
use crate::game::state::{
    Entity, EntityId, EntityKind, GameState,
    PLAYER_BOLT_PROTOTYPE, SAUCER_BOLT_PROTOTYPE,
};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Weapon timing shared by the player ship and saucers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponConfig {
    /// Ticks after spawn before the first shot
    pub initial_delay_ticks: u32,
    /// Ticks between shots
    pub interval_ticks: u32,
    /// Bolts per shot, one per muzzle slot
    pub muzzles: u8,
    /// Bolts are removed after this many ticks
    pub projectile_lifetime_ticks: u32,
}

impl WeaponConfig {
    /// Twin forward cannons.
    pub fn player() -> Self {
        Self {
            initial_delay_ticks: millis_to_ticks(500),
            interval_ticks: millis_to_ticks(250),
            muzzles: 2,
            projectile_lifetime_ticks: millis_to_ticks(3000),
        }
    }

    /// Single turret.
    pub fn saucer() -> Self {
        Self {
            initial_delay_ticks: millis_to_ticks(1000),
            interval_ticks: millis_to_ticks(1500),
            muzzles: 1,
            projectile_lifetime_ticks: millis_to_ticks(3000),
        }
    }
}

// =============================================================================
// TICK INPUT / OUTPUT
// =============================================================================

/// Position and facing of an entity as moved by the host's physics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSync {
    /// Entity moved
    pub entity: EntityId,
    /// New position
    pub position: FixedVec2,
    /// New facing
    pub yaw: Fixed,
}

/// An entity touched one of the wrap boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapCrossing {
    /// Entity that crossed
    pub entity: EntityId,
    /// Position of the boundary object
    pub anchor: FixedVec2,
}

/// Two entities touched. Hosts report both orderings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Entity receiving the collision callback
    pub this: EntityId,
    /// Entity it touched
    pub other: EntityId,
    /// Kind of `other` as the host sees it
    pub other_kind: EntityKind,
}

/// Everything the host observed during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickFrame {
    /// Buttons held
    pub input: InputFrame,
    /// Moved entities
    pub transforms: Vec<TransformSync>,
    /// Entities that crossed the outer destroy boundary
    pub departures: Vec<EntityId>,
    /// Wrap boundary crossings
    pub wraps: Vec<WrapCrossing>,
    /// Contacts
    pub contacts: Vec<Contact>,
}

impl TickFrame {
    /// Nothing happened.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Only buttons.
    pub fn with_input(input: InputFrame) -> Self {
        Self {
            input,
            ..Self::default()
        }
    }

    /// Builder: add a contact reported from both sides.
    pub fn contact_pair(mut self, a: (EntityId, EntityKind), b: (EntityId, EntityKind)) -> Self {
        self.contacts.push(Contact { this: a.0, other: b.0, other_kind: b.1 });
        self.contacts.push(Contact { this: b.0, other: a.0, other_kind: a.1 });
        self
    }

    /// Builder: add a departure.
    pub fn departure(mut self, entity: EntityId) -> Self {
        self.departures.push(entity);
        self
    }

    /// Builder: add a wrap crossing.
    pub fn wrap(mut self, entity: EntityId, anchor: FixedVec2) -> Self {
        self.wraps.push(WrapCrossing { entity, anchor });
        self
    }

    /// Builder: add a transform sync.
    pub fn transform(mut self, entity: EntityId, position: FixedVec2, yaw: Fixed) -> Self {
        self.transforms.push(TransformSync { entity, position, yaw });
        self
    }
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the session ended this tick
    pub game_over: bool,
}

// =============================================================================
// TICK
// =============================================================================

/// Run one simulation tick.
///
/// # Determinism
///
/// Same state, frame and config always produce the same state and events:
/// - Uses BTreeMap for iteration order
/// - Uses fixed-point math only
/// - Uses deterministic RNG (state.rng)
pub fn tick(state: &mut GameState, frame: &TickFrame, config: &GameConfig) -> TickResult {
    let mut result = TickResult::default();
    let was_over = state.is_game_over();

    // 0. Advance tick counter
    state.tick += 1;

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(
        tick = state.tick,
        entities = state.entities.len(),
        contacts = frame.contacts.len(),
        "tick start"
    );

    // 1. Sync transforms from the host
    sync_transforms(state, frame);

    // 2. Outer boundary departures
    process_departures(state, frame);

    // 3. Wrap crossings
    process_wraps(state, frame);

    // 4. Contacts
    process_contacts(state, frame, config);

    // 5. Control input
    apply_input(state, frame.input, config);

    // 6. Timers
    advance_timers(state, config);

    // 7. Spawners
    run_spawners(state, config);

    // Collect events
    result.game_over = !was_over && state.is_game_over();
    result.events = state.take_events();

    result
}

/// Overwrite positions with what the host's physics produced.
fn sync_transforms(state: &mut GameState, frame: &TickFrame) {
    for sync in &frame.transforms {
        if let Some(entity) = state.entity_mut(sync.entity) {
            entity.position = sync.position;
            entity.yaw = sync.yaw;
        }
    }
}

/// Threats and bolts that leave the arena are gone for good.
fn process_departures(state: &mut GameState, frame: &TickFrame) {
    for &id in &frame.departures {
        let Some(kind) = state.entity(id).map(|e| e.kind) else {
            continue;
        };
        if kind.is_threat() || kind.is_projectile() {
            state.remove_entity(id, DestroyReason::LeftArena);
        }
    }
}

/// Teleport the ship to the opposite edge.
fn process_wraps(state: &mut GameState, frame: &TickFrame) {
    for crossing in &frame.wraps {
        let tick = state.tick;
        let Some(entity) = state.entity_mut(crossing.entity) else {
            continue;
        };
        if entity.kind != EntityKind::Player {
            continue;
        }

        entity.position = teleport(crossing.anchor, entity.position);
        let (id, position) = (entity.id, entity.position);
        state.push_event(GameEvent::player_wrapped(tick, id, position));
    }
}

/// Run every contact through the rules and apply the effects.
///
/// Removals happen as the effects are applied; new entities are created
/// once all contacts are done.
fn process_contacts(state: &mut GameState, frame: &TickFrame, config: &GameConfig) {
    let mut deferred: Vec<Effect> = Vec::new();

    for contact in &frame.contacts {
        // Either side may already be gone this tick
        let (Some(this), Some(other)) = (state.entity(contact.this), state.entity(contact.other)) else {
            continue;
        };

        let effects = resolve_contact(this, other);
        for effect in effects {
            apply_effect(state, effect, config, &mut deferred);
        }
    }

    for effect in deferred {
        spawn_from_effect(state, effect, config);
    }
}

fn apply_effect(state: &mut GameState, effect: Effect, config: &GameConfig, deferred: &mut Vec<Effect>) {
    match effect {
        Effect::SpawnExplosion { .. } | Effect::SpawnFragment { .. } => deferred.push(effect),
        Effect::DisplaceThreat { entity, offset_z } => {
            if let Some(threat) = state.entity_mut(entity) {
                threat.position = threat.position.offset_z(offset_z);
            }
        }
        Effect::AwardScore(points) => state.award_score(points),
        Effect::KillPlayer(entity) => kill_player(state, entity, config, deferred),
        Effect::DestroyEntity(entity) => {
            state.remove_entity(entity, DestroyReason::Collision);
        }
    }
}

fn spawn_from_effect(state: &mut GameState, effect: Effect, config: &GameConfig) {
    match effect {
        Effect::SpawnExplosion { position, yaw } => {
            state.spawn_explosion(position, yaw, config.explosion_lifetime_ticks);
        }
        Effect::SpawnFragment { archetype, position, yaw } => {
            let Some(fragment) = config.catalog.fragment(&archetype) else {
                debug!(archetype = %archetype, "unknown fragment archetype, skipped");
                return;
            };
            let velocity = drift_velocity(&mut state.rng, fragment.speed);
            let spawn = ThreatSpawn {
                archetype,
                position,
                yaw,
                velocity,
            };
            state.spawn_threat(EntityKind::Asteroid, fragment, &spawn, true);
        }
        _ => {}
    }
}

/// Lethal hit on the ship. An active shield absorbs it.
fn kill_player(state: &mut GameState, entity: EntityId, config: &GameConfig, deferred: &mut Vec<Effect>) {
    let Some(ship) = state.player.filter(|p| p.entity == entity) else {
        return;
    };
    if ship.shield.is_active() {
        state.push_event(GameEvent::death_absorbed(state.tick, entity));
        return;
    }

    if let Some(body) = state.remove_entity(entity, DestroyReason::Collision) {
        deferred.push(Effect::SpawnExplosion {
            position: body.position,
            yaw: body.yaw,
        });
    }

    match state.lives.on_player_death() {
        DeathOutcome::Respawn { hidden_indicator, lives_left } => {
            state.push_event(GameEvent::player_died(state.tick, entity, hidden_indicator, lives_left));
            state.respawn.restart(config.respawn_delay_ticks);
            debug!(tick = state.tick, lives_left, "player died, respawn scheduled");
        }
        DeathOutcome::GameOver { hidden_indicator } => {
            state.push_event(GameEvent::player_died(state.tick, entity, hidden_indicator, 0));
            enter_game_over(state);
        }
        DeathOutcome::Ignored => {}
    }
}

/// Stop spawning and clear every remaining ship.
fn enter_game_over(state: &mut GameState) {
    state.asteroid_spawner.halt();
    state.saucer_spawner.halt();
    state.respawn.stop();

    let ships: Vec<EntityId> = state
        .entities
        .values()
        .filter(|e| e.kind == EntityKind::Player)
        .map(|e| e.id)
        .collect();
    for id in ships {
        state.remove_entity(id, DestroyReason::GameOver);
    }

    let final_score = state.score.points();
    state.push_event(GameEvent::game_over(state.tick, final_score));
    info!(tick = state.tick, final_score, "game over");
}

/// Shield and fire buttons.
fn apply_input(state: &mut GameState, input: InputFrame, config: &GameConfig) {
    let Some(mut ship) = state.player else {
        return;
    };

    if input.shield_held() && ship.shield.activate(&config.shield) == ShieldActivation::Activated {
        state.push_event(GameEvent::shield_activated(state.tick, ship.entity, false));
        debug!(tick = state.tick, "shield raised");
    }

    if input.fire_held() && !ship.weapon.is_running() {
        if let Some((position, yaw)) = state.entity(ship.entity).map(|e| (e.position, e.yaw)) {
            fire(state, EntityKind::PlayerProjectile, position, yaw, &config.player_weapon);
            ship.weapon.restart(config.player_weapon.interval_ticks);
        }
    }

    state.player = Some(ship);
}

/// One bolt per muzzle slot.
///
/// Bolts start at the shooter; the host places them on its muzzle
/// transforms and gives them their forward speed.
fn fire(state: &mut GameState, kind: EntityKind, position: FixedVec2, yaw: Fixed, weapon: &WeaponConfig) {
    let prototype = match kind {
        EntityKind::PlayerProjectile => PLAYER_BOLT_PROTOTYPE,
        _ => SAUCER_BOLT_PROTOTYPE,
    };
    for muzzle in 0..weapon.muzzles {
        let mut bolt = Entity::new(0, kind, prototype, position, yaw);
        bolt.lifetime = Countdown::start(weapon.projectile_lifetime_ticks);
        state.insert_entity(bolt, Some(muzzle));
    }
}

/// Shield, weapon, respawn, lifetime and saucer fire timers.
fn advance_timers(state: &mut GameState, config: &GameConfig) {
    if let Some(mut ship) = state.player {
        match ship.shield.advance(&config.shield) {
            Some(ShieldTransition::Expired) => {
                state.push_event(GameEvent::shield_expired(state.tick, ship.entity));
            }
            Some(ShieldTransition::Recharged) => {
                state.push_event(GameEvent::shield_recharged(state.tick, ship.entity));
            }
            None => {}
        }
        ship.weapon.advance();
        state.player = Some(ship);
    }

    if state.respawn.advance() && !state.is_game_over() {
        state.spawn_player(config);
    }

    let expired: Vec<EntityId> = state
        .entities
        .values_mut()
        .filter_map(|e| e.lifetime.advance().then_some(e.id))
        .collect();
    for id in expired {
        state.remove_entity(id, DestroyReason::Expired);
    }

    let interval = config.saucer_weapon.interval_ticks;
    let bounds = state.bounds;
    let shooters: Vec<(FixedVec2, Fixed)> = state
        .entities
        .values_mut()
        .filter(|e| e.kind == EntityKind::Saucer)
        .filter_map(|e| {
            if !e.fire_timer.advance() {
                return None;
            }
            e.fire_timer.restart(interval);
            bounds
                .is_inside_playground(e.position, config.playground_margin)
                .then_some((e.position, e.yaw))
        })
        .collect();
    for (position, yaw) in shooters {
        fire(state, EntityKind::SaucerProjectile, position, yaw, &config.saucer_weapon);
    }
}

/// Asteroid and saucer spawners. Idle once the session is over.
fn run_spawners(state: &mut GameState, config: &GameConfig) {
    if state.is_game_over() {
        return;
    }

    if state.asteroid_spawner.advance() {
        let planned = plan_asteroid(&mut state.rng, &config.catalog, &state.bounds);
        if let Some(spawn) = planned {
            if let Some(archetype) = config.catalog.asteroids.iter().find(|a| a.name == spawn.archetype) {
                let id = state.spawn_threat(EntityKind::Asteroid, archetype, &spawn, false);
                debug!(tick = state.tick, entity = id, archetype = %spawn.archetype, "asteroid spawned");
            }
        }
    }

    if state.saucer_spawner.advance() {
        let present = state.saucer_present();
        let saucer = &config.catalog.saucer;
        match plan_saucer(&mut state.rng, saucer, &state.bounds, present) {
            Some(spawn) => {
                let id = state.spawn_threat(EntityKind::Saucer, saucer, &spawn, false);
                if let Some(entity) = state.entity_mut(id) {
                    entity.fire_timer = Countdown::start(config.saucer_weapon.initial_delay_ticks);
                }
                debug!(tick = state.tick, entity = id, "saucer spawned");
            }
            None => debug!(tick = state.tick, "saucer still present, spawn skipped"),
        }
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay a session from recorded frames.
///
/// Returns the final state and every event, including those queued when
/// the session was created.
pub fn replay_session(
    initial_state: GameState,
    frames: &[TickFrame],
    config: &GameConfig,
) -> (GameState, Vec<GameEvent>) {
    let mut state = initial_state;
    let mut all_events = Vec::new();

    for frame in frames {
        let result = tick(&mut state, frame, config);
        all_events.extend(result.events);
    }

    (state, all_events)
}

/// Rebuild a recorded session from scratch and run every frame again.
///
/// The session is recreated with the recording's id, seed and arena; the
/// recording must start with the session's first tick.
pub fn replay_recording(recording: &SessionRecording, config: &GameConfig) -> (GameState, Vec<GameEvent>) {
    let config = GameConfig {
        rng_seed: recording.rng_seed,
        ..config.clone()
    };
    let initial = GameState::new(recording.session_id, &config, Some(recording.bounds));
    replay_session(initial, &recording.frames(), &config)
}
