//! Game Logic Module
//!
//! All gameplay rules. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `bounds`: Arena extents, screen wrap, edge spawn points
//! - `spawner`: Threat archetypes and spawn timing
//! - `collision`: Contact rules producing effects
//! - `lives`: Score and lives state machine
//! - `shield`: Invulnerability timer
//! - `input`: Fire/shield buttons and session recordings
//! - `state`: Session state and entity registry
//! - `tick`: Authoritative per-frame coordinator
//! - `events`: Game events for the host

pub mod bounds;
pub mod spawner;
pub mod collision;
pub mod lives;
pub mod shield;
pub mod input;
pub mod state;
pub mod tick;
pub mod events;

// Re-export key types
pub use bounds::{ArenaEdge, PlaygroundBounds, teleport};
pub use collision::Effect;
pub use events::{GameEvent, GameEventData};
pub use input::{InputFrame, SessionRecording};
pub use lives::{LivesState, Scoreboard};
pub use shield::{ShieldPhase, ShieldTimer};
pub use spawner::{ThreatArchetype, ThreatCatalog};
pub use state::{Entity, EntityId, EntityKind, GameState};
pub use tick::{replay_recording, TickFrame, TickResult};
