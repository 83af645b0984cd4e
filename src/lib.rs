//! # Asteroids Rules
//!
//! Deterministic gameplay rules for a top-down arcade shooter played on the
//! XZ plane. The host engine renders, integrates physics and detects
//! contacts; this crate decides what those contacts mean.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ASTEROIDS RULES                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── fixed.rs    - Q16.16 fixed-point arithmetic             │
//! │  ├── vec2.rs     - XZ-plane vector with fixed-point          │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  ├── timer.rs    - Tick countdowns                           │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Gameplay rules (deterministic)            │
//! │  ├── bounds.rs   - Arena extents and screen wrap             │
//! │  ├── spawner.rs  - Asteroid and saucer spawning              │
//! │  ├── collision.rs- Contact rules and fragmentation           │
//! │  ├── lives.rs    - Score and lives                           │
//! │  ├── shield.rs   - Invulnerability timer                     │
//! │  ├── input.rs    - Fire/shield input                         │
//! │  ├── state.rs    - Session state and entity registry         │
//! │  ├── events.rs   - Events for the host                       │
//! │  └── tick.rs     - Authoritative per-frame coordinator       │
//! │                                                              │
//! │  presentation.rs - HUD sink                                  │
//! │  config.rs       - Session configuration                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating-point arithmetic in game logic
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time dependencies
//! - All randomness from seeded Xorshift128+
//!
//! Given the same seed, configuration and tick frames, a session produces
//! the same events and the same state hash on any platform.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod config;
pub mod error;
pub mod presentation;

// Re-export commonly used types
pub use core::fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use core::vec2::FixedVec2;
pub use core::rng::DeterministicRng;
pub use core::timer::TICK_RATE;
pub use config::GameConfig;
pub use error::ConfigError;
pub use game::input::{InputFrame, SessionRecording};
pub use game::state::{EntityId, EntityKind, GameState};
pub use game::tick::{tick, TickFrame, TickResult};
pub use presentation::{present, PresentationSink};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
