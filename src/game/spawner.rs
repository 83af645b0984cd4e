//! Threat Spawning
//!
//! Two independent spawners share the same shape: wait out a warm-up, then
//! fire once per interval until the session ends. The asteroid spawner
//! always produces a threat; the saucer spawner skips its turn while a
//! saucer is still alive.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, to_fixed, ASTEROID_DRIFT_X, DRIFT_Z};
use crate::core::rng::DeterministicRng;
use crate::core::timer::{millis_to_ticks, Countdown};
use crate::core::vec2::FixedVec2;
use crate::game::bounds::{saucer_yaw, PlaygroundBounds};

// =============================================================================
// ARCHETYPES
// =============================================================================

/// A kind of threat the session can spawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatArchetype {
    /// Prototype name reported to the host
    pub name: String,
    /// Points awarded when destroyed by the player
    pub score: u32,
    /// Velocity multiplier
    pub speed: Fixed,
    /// Fragment archetypes spawned on destruction (asteroids only)
    #[serde(default)]
    pub fragments: Vec<String>,
}

impl ThreatArchetype {
    /// Create an archetype with no fragments.
    pub fn new(name: impl Into<String>, score: u32, speed: Fixed) -> Self {
        Self {
            name: name.into(),
            score,
            speed,
            fragments: Vec::new(),
        }
    }

    /// Builder: set fragment list.
    pub fn with_fragments<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments = fragments.into_iter().map(Into::into).collect();
        self
    }
}

/// Every archetype a session knows about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatCatalog {
    /// Spawned by the asteroid spawner, chosen uniformly
    pub asteroids: Vec<ThreatArchetype>,
    /// Only ever spawned by a breaking asteroid
    pub fragments: Vec<ThreatArchetype>,
    /// Spawned by the saucer spawner
    pub saucer: ThreatArchetype,
}

impl Default for ThreatCatalog {
    fn default() -> Self {
        const ROCK_SPEED: Fixed = to_fixed(0.25);
        const FRAGMENT_SPEED: Fixed = to_fixed(0.35);
        const SAUCER_SPEED: Fixed = to_fixed(0.2);

        let pieces = ["fragment_01", "fragment_02"];
        Self {
            asteroids: vec![
                ThreatArchetype::new("asteroid_01", 10, ROCK_SPEED).with_fragments(pieces),
                ThreatArchetype::new("asteroid_02", 10, ROCK_SPEED).with_fragments(pieces),
                ThreatArchetype::new("asteroid_03", 10, ROCK_SPEED).with_fragments(pieces),
            ],
            fragments: vec![
                ThreatArchetype::new("fragment_01", 20, FRAGMENT_SPEED),
                ThreatArchetype::new("fragment_02", 20, FRAGMENT_SPEED),
            ],
            saucer: ThreatArchetype::new("saucer", 50, SAUCER_SPEED),
        }
    }
}

impl ThreatCatalog {
    /// Look up a fragment archetype by name.
    pub fn fragment(&self, name: &str) -> Option<&ThreatArchetype> {
        self.fragments.iter().find(|a| a.name == name)
    }
}

// =============================================================================
// SPAWN TIMING
// =============================================================================

/// Spawner timing, in ticks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnerConfig {
    /// Wait before the first spawn of either kind
    pub warmup_ticks: u32,
    /// Ticks between asteroid spawns
    pub asteroid_interval_ticks: u32,
    /// Ticks between saucer spawn attempts
    pub saucer_interval_ticks: u32,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            warmup_ticks: millis_to_ticks(2000),
            asteroid_interval_ticks: millis_to_ticks(500),
            saucer_interval_ticks: millis_to_ticks(10_000),
        }
    }
}

/// Warm-up then fixed-interval trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawner {
    countdown: Countdown,
    interval: u32,
}

impl Spawner {
    /// First fire after `warmup` ticks, then every `interval` ticks.
    pub fn new(warmup: u32, interval: u32) -> Self {
        Self {
            countdown: Countdown::start(warmup),
            interval,
        }
    }

    /// Advance one tick. Returns true when a spawn is due.
    pub fn advance(&mut self) -> bool {
        if self.countdown.advance() {
            self.countdown.restart(self.interval);
            true
        } else {
            false
        }
    }

    /// Stop for good.
    pub fn halt(&mut self) {
        self.countdown.stop();
    }

    /// Has [`halt`](Self::halt) been called?
    pub fn is_halted(&self) -> bool {
        !self.countdown.is_running()
    }

    /// Ticks until the next fire.
    pub fn remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }
}

// =============================================================================
// SPAWN PLANNING
// =============================================================================

/// A threat ready to be put into the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreatSpawn {
    /// Archetype name
    pub archetype: String,
    /// Spawn point
    pub position: FixedVec2,
    /// Facing, in fixed-point degrees
    pub yaw: Fixed,
    /// Initial velocity
    pub velocity: FixedVec2,
}

/// Random asteroid drift: `(U[-12,12), U[-9,9)) * speed`.
pub fn drift_velocity(rng: &mut DeterministicRng, speed: Fixed) -> FixedVec2 {
    rng.next_spread(ASTEROID_DRIFT_X, DRIFT_Z).scale(speed)
}

/// Saucer heading: straight back across the arena with a random Z drift.
pub fn saucer_velocity(rng: &mut DeterministicRng, position: FixedVec2, speed: Fixed) -> FixedVec2 {
    let drift_z = rng.next_fixed_range(-DRIFT_Z, DRIFT_Z);
    FixedVec2::new(position.x.wrapping_neg(), drift_z).scale(speed)
}

/// Pick a uniformly random asteroid archetype and place it on an edge.
///
/// Returns `None` only for an empty catalog.
pub fn plan_asteroid(
    rng: &mut DeterministicRng,
    catalog: &ThreatCatalog,
    bounds: &PlaygroundBounds,
) -> Option<ThreatSpawn> {
    let index = rng.choose_index(catalog.asteroids.len())?;
    let archetype = &catalog.asteroids[index];
    let (position, _) = bounds.spawn_position(rng);
    let velocity = drift_velocity(rng, archetype.speed);

    Some(ThreatSpawn {
        archetype: archetype.name.clone(),
        position,
        yaw: 0,
        velocity,
    })
}

/// Place a saucer on an edge, facing inward.
///
/// The spawn point is drawn even when a saucer is already present so the
/// RNG stream does not depend on the skip.
pub fn plan_saucer(
    rng: &mut DeterministicRng,
    saucer: &ThreatArchetype,
    bounds: &PlaygroundBounds,
    saucer_present: bool,
) -> Option<ThreatSpawn> {
    let (position, _) = bounds.spawn_position(rng);
    if saucer_present {
        return None;
    }

    let velocity = saucer_velocity(rng, position, saucer.speed);
    Some(ThreatSpawn {
        archetype: saucer.name.clone(),
        position,
        yaw: saucer_yaw(position),
        velocity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::{fixed_abs, fixed_mul, SAUCER_FACING_YAW};

    #[test]
    fn test_default_timing() {
        let config = SpawnerConfig::default();
        assert_eq!(config.warmup_ticks, 120);
        assert_eq!(config.asteroid_interval_ticks, 30);
        assert_eq!(config.saucer_interval_ticks, 600);
    }

    #[test]
    fn test_spawner_fire_ticks() {
        let mut spawner = Spawner::new(120, 30);
        let mut fired = Vec::new();
        for t in 1..=200u32 {
            if spawner.advance() {
                fired.push(t);
            }
        }
        assert_eq!(fired, vec![120, 150, 180]);
    }

    #[test]
    fn test_halted_spawner_never_fires() {
        let mut spawner = Spawner::new(1, 1);
        spawner.halt();
        assert!(spawner.is_halted());
        assert!((0..100).all(|_| !spawner.advance()));
    }

    #[test]
    fn test_plan_asteroid_on_edge() {
        let catalog = ThreatCatalog::default();
        let bounds = PlaygroundBounds::default();
        let mut rng = DeterministicRng::new(11);

        for _ in 0..50 {
            let spawn = plan_asteroid(&mut rng, &catalog, &bounds).unwrap();
            assert!(catalog.asteroids.iter().any(|a| a.name == spawn.archetype));
            assert_eq!(spawn.yaw, 0);
            let on_x_edge = fixed_abs(spawn.position.x) == bounds.max_x;
            let on_z_edge = fixed_abs(spawn.position.z) == bounds.max_z;
            assert!(on_x_edge || on_z_edge);
        }
    }

    #[test]
    fn test_plan_asteroid_empty_catalog() {
        let mut catalog = ThreatCatalog::default();
        catalog.asteroids.clear();
        let mut rng = DeterministicRng::new(1);
        assert!(plan_asteroid(&mut rng, &catalog, &PlaygroundBounds::default()).is_none());
    }

    #[test]
    fn test_drift_velocity_range() {
        let speed = to_fixed(0.5);
        let mut rng = DeterministicRng::new(5);
        for _ in 0..200 {
            let v = drift_velocity(&mut rng, speed);
            assert!(fixed_abs(v.x) <= fixed_mul(ASTEROID_DRIFT_X, speed));
            assert!(fixed_abs(v.z) <= fixed_mul(DRIFT_Z, speed));
        }
    }

    #[test]
    fn test_plan_saucer_skips_when_present() {
        let catalog = ThreatCatalog::default();
        let bounds = PlaygroundBounds::default();
        let mut rng = DeterministicRng::new(8);
        assert!(plan_saucer(&mut rng, &catalog.saucer, &bounds, true).is_none());
    }

    #[test]
    fn test_plan_saucer_heads_inward() {
        let catalog = ThreatCatalog::default();
        let bounds = PlaygroundBounds::default();
        let mut rng = DeterministicRng::new(21);

        for _ in 0..50 {
            let spawn = plan_saucer(&mut rng, &catalog.saucer, &bounds, false).unwrap();
            assert_eq!(spawn.archetype, "saucer");
            if spawn.position.x > 0 {
                assert_eq!(spawn.yaw, -SAUCER_FACING_YAW);
                assert!(spawn.velocity.x <= 0);
            } else if spawn.position.x < 0 {
                assert_eq!(spawn.yaw, SAUCER_FACING_YAW);
                assert!(spawn.velocity.x >= 0);
            }
        }
    }

    #[test]
    fn test_fragment_lookup() {
        let catalog = ThreatCatalog::default();
        assert!(catalog.fragment("fragment_02").is_some());
        assert!(catalog.fragment("asteroid_01").is_none());
    }
}
