//! Configuration errors.
//!
//! Gameplay itself never fails: missing references fall back to defaults and
//! repeated activations are skipped. Loading a [`GameConfig`](crate::config::GameConfig)
//! is the only fallible surface.

use thiserror::Error;

/// Errors raised while loading or validating a game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config JSON is malformed.
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Environment override could not be parsed.
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Raw value found
        value: String,
    },

    /// No asteroid archetype to spawn.
    #[error("asteroid catalog is empty")]
    EmptyAsteroidCatalog,

    /// Two archetypes share a name.
    #[error("duplicate archetype name {0:?}")]
    DuplicateArchetype(String),

    /// An asteroid names a fragment archetype that does not exist.
    #[error("archetype {parent:?} references unknown fragment {fragment:?}")]
    UnknownFragment {
        /// Asteroid archetype
        parent: String,
        /// Missing fragment name
        fragment: String,
    },

    /// A fragment archetype lists fragments of its own.
    #[error("fragment archetype {0:?} must not fragment further")]
    RecursiveFragment(String),

    /// The saucer archetype lists fragments.
    #[error("saucer archetype must not fragment")]
    SaucerFragments,

    /// An arena half-extent is negative.
    #[error("arena bounds must not be negative (max_x {max_x}, max_z {max_z})")]
    InvalidBounds {
        /// Raw Q16.16 half-width
        max_x: i32,
        /// Raw Q16.16 half-depth
        max_z: i32,
    },

    /// A timer interval that drives a repeating loop is zero.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}
