//! Session Hashing
//!
//! SHA-256 digest over everything that decides the rest of a session:
//! tick, seed, RNG state, registry, score, lives and every countdown.
//! Two runs fed the same seed and frames must produce the same digest.

use sha2::{Sha256, Digest};
use super::fixed::Fixed;
use super::vec2::FixedVec2;

/// 32-byte SHA-256 digest.
pub type StateHash = [u8; 32];

/// Domain tag prefixed to every session digest.
const SESSION_DOMAIN: &[u8] = b"ASTEROIDS_STATE_V1";

/// Marker written for a countdown that is not running.
const TIMER_IDLE: u32 = u32::MAX;

/// Streams typed values into SHA-256, little-endian, in call order.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Start a digest under `domain`.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// One byte.
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Four bytes, little-endian.
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Eight bytes, little-endian.
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Raw Q16.16 bits.
    pub fn update_fixed(&mut self, value: Fixed) {
        self.hasher.update(value.to_le_bytes());
    }

    /// X then Z.
    pub fn update_vec2(&mut self, value: FixedVec2) {
        self.update_fixed(value.x);
        self.update_fixed(value.z);
    }

    /// 0 or 1.
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(u8::from(value));
    }

    /// Length-prefixed so adjacent strings cannot alias.
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Ticks left on a countdown, or the idle marker when it is stopped.
    pub fn update_timer(&mut self, remaining: Option<u32>) {
        self.update_u32(remaining.unwrap_or(TIMER_IDLE));
    }

    /// Close the digest.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Digest a session: tick and seed first, then whatever `add_state` feeds.
pub fn compute_state_hash<F>(tick: u32, rng_seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::new(SESSION_DOMAIN);
    hasher.update_u32(tick);
    hasher.update_u64(rng_seed);
    add_state(&mut hasher);
    hasher.finalize()
}
