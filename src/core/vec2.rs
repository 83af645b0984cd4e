//! Fixed-Point Planar Vector
//!
//! Positions and velocities on the XZ gameplay plane (Y is always 0).

use std::fmt;
use std::ops::{Add, Sub, Neg};
use serde::{Serialize, Deserialize};

use super::fixed::{Fixed, FIXED_SCALE, fixed_mul, to_float};

/// Point or velocity on the XZ plane with fixed-point components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FixedVec2 {
    /// X component (Q16.16 fixed-point)
    pub x: Fixed,
    /// Z component (Q16.16 fixed-point)
    pub z: Fixed,
}

impl FixedVec2 {
    /// The arena origin, also "no velocity".
    pub const ZERO: Self = Self { x: 0, z: 0 };

    /// Create a new vector from fixed-point components.
    #[inline]
    pub const fn new(x: Fixed, z: Fixed) -> Self {
        Self { x, z }
    }

    /// Create a vector from whole world units.
    #[inline]
    pub const fn from_ints(x: i32, z: i32) -> Self {
        Self {
            x: x << FIXED_SCALE,
            z: z << FIXED_SCALE,
        }
    }

    /// Multiply both components by a fixed-point factor.
    #[inline]
    pub fn scale(self, factor: Fixed) -> Self {
        Self::new(fixed_mul(self.x, factor), fixed_mul(self.z, factor))
    }

    /// Same point moved along Z.
    #[inline]
    pub fn offset_z(self, dz: Fixed) -> Self {
        Self::new(self.x, self.z.wrapping_add(dz))
    }

    /// World units, for logs only.
    #[inline]
    pub fn to_floats(self) -> (f32, f32) {
        (to_float(self.x), to_float(self.z))
    }
}

impl Add for FixedVec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.wrapping_add(rhs.x), self.z.wrapping_add(rhs.z))
    }
}

impl Sub for FixedVec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.wrapping_sub(rhs.x), self.z.wrapping_sub(rhs.z))
    }
}

impl Neg for FixedVec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(self.x.wrapping_neg(), self.z.wrapping_neg())
    }
}

impl fmt::Debug for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fz) = self.to_floats();
        write!(f, "XZ({:.3}, {:.3})", fx, fz)
    }
}

impl fmt::Display for FixedVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (fx, fz) = self.to_floats();
        write!(f, "({:.3}, {:.3})", fx, fz)
    }
}
