//! Q16.16 Fixed-Point Arithmetic
//!
//! Every position, velocity, yaw and tuning constant the rules touch is an
//! integer, so a session replays bit-for-bit on any host.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │  i32 = [sign][16 integer bits][16 fraction bits]          │
//! │                                                           │
//! │  1 world unit   = 65536                                   │
//! │  arena (22x17)  = 1441792 x 1114112 half-extents          │
//! │  resolution     = 1/65536 unit, about 0.000015            │
//! │  headroom       = +/-32767 units, far past any edge       │
//! └───────────────────────────────────────────────────────────┘
//! ```

/// Q16.16 world units.
pub type Fixed = i32;

/// Fractional bits.
pub const FIXED_SCALE: i32 = 16;

/// One world unit.
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE;

/// Half a world unit.
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1;

// =============================================================================
// GAME CONSTANTS (integer literals)
// =============================================================================

/// Default arena half-width: 22.0 = 22 * 65536
pub const ARENA_MAX_X: Fixed = 1441792;

/// Default arena half-depth: 17.0 = 17 * 65536
pub const ARENA_MAX_Z: Fixed = 1114112;

/// Pull-back applied before mirroring a wrapped coordinate: 1.0
pub const WRAP_OFFSET: Fixed = FIXED_ONE;

/// Parent displacement along Z between the two fragment spawns: 10.0
pub const FRAGMENT_DISPLACEMENT: Fixed = 655360;

/// Inset from the arena edge inside which a saucer may fire: 3.0
pub const PLAYGROUND_MARGIN: Fixed = 196608;

/// Asteroid base velocity range on X: [-12.0, 12.0)
pub const ASTEROID_DRIFT_X: Fixed = 786432;

/// Asteroid (and saucer) base velocity range on Z: [-9.0, 9.0)
pub const DRIFT_Z: Fixed = 589824;

/// Saucer facing yaw in degrees: 90.0
pub const SAUCER_FACING_YAW: Fixed = 5898240;

// =============================================================================
// OPERATIONS
// =============================================================================

/// Fixed-point value of a float literal, for constants and config parsing.
///
/// Tick code never calls this; it works on `Fixed` throughout.
///
/// # Example
/// ```
/// use asteroids_rules::core::fixed::{to_fixed, FIXED_ONE};
/// const ROCK_SPEED: i32 = to_fixed(0.25);
/// assert_eq!(ROCK_SPEED, FIXED_ONE / 4);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// World units as float, for logs.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Whole world units.
#[inline]
pub const fn from_int(i: i32) -> Fixed {
    i << FIXED_SCALE
}

/// Multiply two fixed-point numbers (i64 intermediate, truncating).
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i64) * (b as i64);
    (wide >> FIXED_SCALE) as Fixed
}

/// Absolute value.
#[inline]
pub fn fixed_abs(x: Fixed) -> Fixed {
    if x < 0 { x.wrapping_neg() } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_constants() {
        assert_eq!(FIXED_ONE, 65536);
        assert_eq!(FIXED_HALF, 32768);
        assert_eq!(WRAP_OFFSET, FIXED_ONE);
    }

    #[test]
    fn test_to_fixed() {
        assert_eq!(to_fixed(0.5), FIXED_HALF);
        assert_eq!(to_fixed(-1.0), -FIXED_ONE);
        assert_eq!(from_int(-3), to_fixed(-3.0));
        assert_eq!(to_float(to_fixed(12.5)), 12.5);
    }

    #[test]
    fn test_fixed_mul_truncates() {
        assert_eq!(fixed_mul(from_int(12), to_fixed(0.25)), from_int(3));
        assert_eq!(fixed_mul(from_int(-9), to_fixed(0.5)), to_fixed(-4.5));
        // One ulp below zero stays below zero
        assert_eq!(fixed_mul(-1, FIXED_HALF), -1);
    }

    #[test]
    fn test_game_constants() {
        assert_eq!(ARENA_MAX_X, from_int(22));
        assert_eq!(ARENA_MAX_Z, from_int(17));
        assert_eq!(FRAGMENT_DISPLACEMENT, from_int(10));
        assert_eq!(PLAYGROUND_MARGIN, from_int(3));
        assert_eq!(ASTEROID_DRIFT_X, from_int(12));
        assert_eq!(DRIFT_Z, from_int(9));
        assert_eq!(SAUCER_FACING_YAW, from_int(90));
    }

    #[test]
    fn test_fixed_abs() {
        assert_eq!(fixed_abs(-ARENA_MAX_X), ARENA_MAX_X);
        assert_eq!(fixed_abs(FIXED_HALF), FIXED_HALF);
        assert_eq!(fixed_abs(0), 0);
    }
}
