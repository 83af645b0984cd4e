//! Core deterministic primitives.
//!
//! Everything the rules build on: fixed-point math, planar vectors,
//! the seeded RNG, tick countdowns and state hashing.

pub mod fixed;
pub mod vec2;
pub mod rng;
pub mod timer;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use vec2::FixedVec2;
pub use rng::DeterministicRng;
pub use timer::{Countdown, TICK_RATE};
pub use hash::{compute_state_hash, StateHash};
