//! Session Configuration
//!
//! [`GameConfig`] gathers the tuning of every subsystem. Defaults match the
//! classic arcade feel; a JSON file and a handful of environment variables
//! can override them.
//!
//! | Variable | Effect |
//! |---|---|
//! | `ASTEROIDS_CONFIG` | path of a JSON config loaded before other overrides |
//! | `ASTEROIDS_SEED` | RNG seed (u64) |
//! | `ASTEROIDS_MAX_X` | arena half-width, in world units |
//! | `ASTEROIDS_MAX_Z` | arena half-depth, in world units |

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, to_fixed, PLAYGROUND_MARGIN};
use crate::error::ConfigError;
use crate::game::bounds::PlaygroundBounds;
use crate::game::lives::DEFAULT_RESPAWN_DELAY_TICKS;
use crate::game::shield::ShieldConfig;
use crate::game::spawner::{SpawnerConfig, ThreatCatalog};
use crate::game::tick::WeaponConfig;

/// Environment variable naming a JSON config file.
pub const ENV_CONFIG_PATH: &str = "ASTEROIDS_CONFIG";
/// Environment variable overriding the RNG seed.
pub const ENV_SEED: &str = "ASTEROIDS_SEED";
/// Environment variable overriding the arena half-width.
pub const ENV_MAX_X: &str = "ASTEROIDS_MAX_X";
/// Environment variable overriding the arena half-depth.
pub const ENV_MAX_Z: &str = "ASTEROIDS_MAX_Z";

/// Complete tuning of a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for every random draw of the session
    pub rng_seed: u64,
    /// Arena half-extents used when the host reports none
    pub bounds: PlaygroundBounds,
    /// Spawner timing
    pub spawner: SpawnerConfig,
    /// Threat archetypes
    pub catalog: ThreatCatalog,
    /// Shield durations
    pub shield: ShieldConfig,
    /// Ticks between a death and the next ship
    pub respawn_delay_ticks: u32,
    /// Player weapon
    pub player_weapon: WeaponConfig,
    /// Saucer weapon
    pub saucer_weapon: WeaponConfig,
    /// How long explosions stay in the registry
    pub explosion_lifetime_ticks: u32,
    /// Saucers hold fire until this far inside the arena edges
    pub playground_margin: Fixed,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rng_seed: 0,
            bounds: PlaygroundBounds::default(),
            spawner: SpawnerConfig::default(),
            catalog: ThreatCatalog::default(),
            shield: ShieldConfig::default(),
            respawn_delay_ticks: DEFAULT_RESPAWN_DELAY_TICKS,
            player_weapon: WeaponConfig::player(),
            saucer_weapon: WeaponConfig::saucer(),
            explosion_lifetime_ticks: 120,
            playground_margin: PLAYGROUND_MARGIN,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Defaults, overridden by the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup(ENV_CONFIG_PATH) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(value) = lookup(ENV_SEED) {
            config.rng_seed = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { var: ENV_SEED, value })?;
        }
        if let Some(value) = lookup(ENV_MAX_X) {
            config.bounds.max_x = parse_units(ENV_MAX_X, value)?;
        }
        if let Some(value) = lookup(ENV_MAX_Z) {
            config.bounds.max_z = parse_units(ENV_MAX_Z, value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check bounds, cross-references and intervals.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.bounds.is_valid() {
            return Err(ConfigError::InvalidBounds {
                max_x: self.bounds.max_x,
                max_z: self.bounds.max_z,
            });
        }

        let catalog = &self.catalog;
        if catalog.asteroids.is_empty() {
            return Err(ConfigError::EmptyAsteroidCatalog);
        }

        let mut names = BTreeSet::new();
        let all = catalog
            .asteroids
            .iter()
            .chain(catalog.fragments.iter())
            .chain(std::iter::once(&catalog.saucer));
        for archetype in all {
            if !names.insert(archetype.name.as_str()) {
                return Err(ConfigError::DuplicateArchetype(archetype.name.clone()));
            }
        }

        for asteroid in &catalog.asteroids {
            for fragment in &asteroid.fragments {
                if catalog.fragment(fragment).is_none() {
                    return Err(ConfigError::UnknownFragment {
                        parent: asteroid.name.clone(),
                        fragment: fragment.clone(),
                    });
                }
            }
        }

        if let Some(fragment) = catalog.fragments.iter().find(|f| !f.fragments.is_empty()) {
            return Err(ConfigError::RecursiveFragment(fragment.name.clone()));
        }
        if !catalog.saucer.fragments.is_empty() {
            return Err(ConfigError::SaucerFragments);
        }

        if self.spawner.asteroid_interval_ticks == 0 {
            return Err(ConfigError::ZeroInterval("spawner.asteroid_interval_ticks"));
        }
        if self.spawner.saucer_interval_ticks == 0 {
            return Err(ConfigError::ZeroInterval("spawner.saucer_interval_ticks"));
        }
        if self.saucer_weapon.interval_ticks == 0 {
            return Err(ConfigError::ZeroInterval("saucer_weapon.interval_ticks"));
        }

        Ok(())
    }
}

/// Parse a world-unit value such as `"22"` or `"17.5"` into fixed point.
fn parse_units(var: &'static str, value: String) -> Result<Fixed, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(units) if units.is_finite() && units >= 0.0 => Ok(to_fixed(units)),
        _ => Err(ConfigError::InvalidEnv { var, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::from_int;
    use crate::game::spawner::ThreatArchetype;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let owned: Vec<(String, String)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| owned.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_default_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = GameConfig::from_json(r#"{ "rng_seed": 99, "respawn_delay_ticks": 60 }"#).unwrap();
        assert_eq!(config.rng_seed, 99);
        assert_eq!(config.respawn_delay_ticks, 60);
        assert_eq!(config.shield, ShieldConfig::default());
        assert_eq!(config.catalog, ThreatCatalog::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = GameConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let config = GameConfig::from_lookup(lookup_from(&[
            (ENV_SEED, "4242"),
            (ENV_MAX_X, "30"),
            (ENV_MAX_Z, "12.5"),
        ]))
        .unwrap();

        assert_eq!(config.rng_seed, 4242);
        assert_eq!(config.bounds.max_x, from_int(30));
        assert_eq!(config.bounds.max_z, to_fixed(12.5));
    }

    #[test]
    fn test_env_invalid_seed() {
        let err = GameConfig::from_lookup(lookup_from(&[(ENV_SEED, "lots")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_SEED, .. }));
    }

    #[test]
    fn test_env_negative_bounds_rejected() {
        let err = GameConfig::from_lookup(lookup_from(&[(ENV_MAX_X, "-4")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_MAX_X, .. }));
    }

    #[test]
    fn test_json_negative_bounds_rejected() {
        let err = GameConfig::from_json(r#"{"bounds":{"max_x":-2147483648,"max_z":-65536}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidBounds { max_x: i32::MIN, max_z: -65536 }
        ));

        let err = GameConfig::from_json(r#"{"bounds":{"max_x":65536,"max_z":-1}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBounds { .. }));

        let zero = GameConfig::from_json(r#"{"bounds":{"max_x":0,"max_z":0}}"#).unwrap();
        assert!(zero.bounds.is_degenerate());
    }

    #[test]
    fn test_missing_config_file() {
        let err = GameConfig::from_lookup(lookup_from(&[(ENV_CONFIG_PATH, "/nonexistent/asteroids.json")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_rejects_unknown_fragment() {
        let mut config = GameConfig::default();
        config.catalog.asteroids[0].fragments = vec!["pebble".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::UnknownFragment { .. })));
    }

    #[test]
    fn test_rejects_recursive_fragment() {
        let mut config = GameConfig::default();
        config.catalog.fragments[0].fragments = vec!["fragment_02".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::RecursiveFragment(name)) if name == "fragment_01"));
    }

    #[test]
    fn test_rejects_saucer_fragments() {
        let mut config = GameConfig::default();
        config.catalog.saucer.fragments = vec!["fragment_01".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::SaucerFragments)));
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let mut config = GameConfig::default();
        config.catalog.asteroids.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyAsteroidCatalog)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let mut config = GameConfig::default();
        config.catalog.fragments.push(ThreatArchetype::new("saucer", 1, 0));
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateArchetype(name)) if name == "saucer"));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut config = GameConfig::default();
        config.spawner.asteroid_interval_ticks = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval(_))));
    }
}
