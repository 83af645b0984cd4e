//! Deterministic Random Number Generator
//!
//! Xorshift128+ seeded through SplitMix64. Every random draw of a session
//! (edge rolls, spawn coordinates, archetype picks, drift velocities) comes
//! from the one generator stored in `GameState`, in tick order.

use serde::{Serialize, Deserialize};

use super::fixed::Fixed;
use super::vec2::FixedVec2;

/// Seeded session PRNG.
///
/// # Example
///
/// ```
/// use asteroids_rules::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_int(4), b.next_int(4));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Seed a generator. Any seed, including 0, is valid.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Xorshift must never see an all-zero state
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Raw 64-bit draw.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Integer in `[0, max)`; 0 when `max == 0`.
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as u32
    }

    /// Fixed in `[0, max)`; 0 when `max <= 0`.
    #[inline]
    pub fn next_fixed(&mut self, max: Fixed) -> Fixed {
        if max <= 0 {
            return 0;
        }
        let raw = (self.next_u64() >> 32) as u32;
        ((raw as i64 * max as i64) >> 32) as Fixed
    }

    /// Fixed in `[min, max)`.
    ///
    /// An empty range returns `min`, so zero-sized arenas put every spawn
    /// on the origin. A draw is consumed only for non-empty ranges.
    #[inline]
    pub fn next_fixed_range(&mut self, min: Fixed, max: Fixed) -> Fixed {
        if min >= max {
            return min;
        }
        let range = max.wrapping_sub(min);
        min.wrapping_add(self.next_fixed(range))
    }

    /// Vector in `[-half_x, half_x) x [-half_z, half_z)`, X drawn first.
    #[inline]
    pub fn next_spread(&mut self, half_x: Fixed, half_z: Fixed) -> FixedVec2 {
        let x = self.next_fixed_range(-half_x, half_x);
        let z = self.next_fixed_range(-half_z, half_z);
        FixedVec2::new(x, z)
    }

    /// Uniform index into `len` items; `None` for an empty list.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.next_int(len as u32) as usize)
        }
    }

    /// Internal state (hashed into the session hash).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Resume from a saved state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::{from_int, ARENA_MAX_X, ARENA_MAX_Z};

    #[test]
    fn test_same_seed_same_draws() {
        let mut a = DeterministicRng::new(12345);
        let mut b = DeterministicRng::new(12345);
        for _ in 0..500 {
            assert_eq!(a.next_int(4), b.next_int(4));
            assert_eq!(a.next_spread(ARENA_MAX_X, ARENA_MAX_Z), b.next_spread(ARENA_MAX_X, ARENA_MAX_Z));
        }

        let mut c = DeterministicRng::new(54321);
        assert_ne!(a.next_u64(), c.next_u64());
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = DeterministicRng::new(0);
        let draws: Vec<u64> = (0..4).map(|_| rng.next_u64()).collect();
        assert!(draws.iter().any(|&d| d != 0));
    }

    #[test]
    fn test_edge_roll_covers_all_edges() {
        let mut rng = DeterministicRng::new(1234);
        let mut seen = [0u32; 4];
        for _ in 0..1000 {
            seen[rng.next_int(4) as usize] += 1;
        }
        assert!(seen.iter().all(|&n| n > 150));
        assert_eq!(rng.next_int(0), 0);
    }

    #[test]
    fn test_fixed_range_half_open() {
        let mut rng = DeterministicRng::new(9999);
        let (lo, hi) = (-ARENA_MAX_X, ARENA_MAX_X);
        for _ in 0..1000 {
            let v = rng.next_fixed_range(lo, hi);
            assert!(v >= lo && v < hi);
        }
    }

    #[test]
    fn test_empty_range_consumes_nothing() {
        let mut a = DeterministicRng::new(3);
        let mut b = DeterministicRng::new(3);
        assert_eq!(a.next_fixed_range(from_int(5), from_int(5)), from_int(5));
        assert_eq!(a.state(), b.state());
        a.next_u64();
        b.next_u64();
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_choose_index() {
        let mut rng = DeterministicRng::new(77);
        assert_eq!(rng.choose_index(0), None);
        for _ in 0..100 {
            assert!(rng.choose_index(3).is_some_and(|i| i < 3));
        }
    }

    #[test]
    fn test_resume_from_saved_state() {
        let mut rng = DeterministicRng::new(5555);
        for _ in 0..50 {
            rng.next_u64();
        }

        let saved = rng.state();
        let expected: Vec<u32> = (0..10).map(|_| rng.next_int(3)).collect();

        let mut resumed = DeterministicRng::default();
        resumed.set_state(saved);
        let replayed: Vec<u32> = (0..10).map(|_| resumed.next_int(3)).collect();
        assert_eq!(replayed, expected);
    }
}
