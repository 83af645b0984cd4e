//! Arena Bounds and Screen Wrap
//!
//! The arena is an axis-aligned rectangle centred on the origin, described
//! by its half-extents. Its four edges are wrap boundaries for the player
//! and the spawn line for threats.

use serde::{Serialize, Deserialize};

use crate::core::fixed::{Fixed, ARENA_MAX_X, ARENA_MAX_Z, WRAP_OFFSET, SAUCER_FACING_YAW, fixed_abs};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::FixedVec2;

/// Half-extents of the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaygroundBounds {
    /// Distance from the origin to the left/right edges
    pub max_x: Fixed,
    /// Distance from the origin to the up/down edges
    pub max_z: Fixed,
}

impl Default for PlaygroundBounds {
    fn default() -> Self {
        Self::new(ARENA_MAX_X, ARENA_MAX_Z)
    }
}

impl PlaygroundBounds {
    /// Create bounds from half-extents.
    pub const fn new(max_x: Fixed, max_z: Fixed) -> Self {
        Self { max_x, max_z }
    }

    /// Neither half-extent is negative.
    pub fn is_valid(&self) -> bool {
        self.max_x >= 0 && self.max_z >= 0
    }

    /// Bounds read from the host's arena object, or the configured ones
    /// when the host has none. A negative extent is never used: it falls
    /// back to the configured bounds, then to the default arena.
    pub fn resolve(detected: Option<PlaygroundBounds>, configured: PlaygroundBounds) -> Self {
        match detected {
            Some(bounds) if bounds.is_valid() => return bounds,
            Some(bounds) => tracing::warn!("ignoring negative arena bounds {:?}", bounds),
            None => tracing::debug!("no arena bounds reported, using configured {:?}", configured),
        }

        if configured.is_valid() {
            configured
        } else {
            tracing::warn!("configured arena bounds {:?} are negative, using default", configured);
            Self::default()
        }
    }

    /// Both extents are zero (spawns collapse onto the origin).
    pub fn is_degenerate(&self) -> bool {
        self.max_x == 0 && self.max_z == 0
    }

    /// Strictly inside the arena shrunk by `margin` on every side.
    pub fn is_inside_playground(&self, position: FixedVec2, margin: Fixed) -> bool {
        fixed_abs(position.x) < self.max_x - margin && fixed_abs(position.z) < self.max_z - margin
    }

    /// Pick a spawn point on one of the four edges.
    ///
    /// The edge is uniform over all four; the coordinate along the edge is
    /// uniform in `[-max, max)`.
    pub fn spawn_position(&self, rng: &mut DeterministicRng) -> (FixedVec2, ArenaEdge) {
        let edge = ArenaEdge::ALL[rng.next_int(4) as usize];
        let along_x = rng.next_fixed_range(-self.max_x, self.max_x);
        let along_z = rng.next_fixed_range(-self.max_z, self.max_z);

        let position = match edge {
            ArenaEdge::Up => FixedVec2::new(along_x, self.max_z),
            ArenaEdge::Down => FixedVec2::new(along_x, -self.max_z),
            ArenaEdge::Right => FixedVec2::new(self.max_x, along_z),
            ArenaEdge::Left => FixedVec2::new(-self.max_x, along_z),
        };

        (position, edge)
    }
}

/// One of the four wrap boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaEdge {
    /// +Z edge
    Up,
    /// -Z edge
    Down,
    /// +X edge
    Right,
    /// -X edge
    Left,
}

impl ArenaEdge {
    /// All edges, in spawn-roll order.
    pub const ALL: [ArenaEdge; 4] = [ArenaEdge::Up, ArenaEdge::Down, ArenaEdge::Right, ArenaEdge::Left];

    /// Position of the boundary object for this edge. Lies on a single axis.
    pub fn anchor(self, bounds: &PlaygroundBounds) -> FixedVec2 {
        match self {
            ArenaEdge::Up => FixedVec2::new(0, bounds.max_z),
            ArenaEdge::Down => FixedVec2::new(0, -bounds.max_z),
            ArenaEdge::Right => FixedVec2::new(bounds.max_x, 0),
            ArenaEdge::Left => FixedVec2::new(-bounds.max_x, 0),
        }
    }
}

/// Pull a coordinate one offset towards the origin, then mirror it.
///
/// Zero counts as positive, so it maps to `+WRAP_OFFSET`.
#[inline]
pub fn wrap_coordinate(coordinate: Fixed) -> Fixed {
    let pulled = if coordinate < 0 {
        coordinate + WRAP_OFFSET
    } else {
        coordinate - WRAP_OFFSET
    };
    -pulled
}

/// Move a position that crossed the boundary at `anchor` to the opposite edge.
///
/// The anchor's non-zero component picks the axis that wraps; the other
/// coordinate is untouched. If both components are non-zero the Z axis wins.
/// An anchor at the origin names no boundary and yields the origin.
pub fn teleport(anchor: FixedVec2, position: FixedVec2) -> FixedVec2 {
    let mut wrapped = FixedVec2::ZERO;

    if anchor.x != 0 {
        wrapped = FixedVec2::new(wrap_coordinate(position.x), position.z);
    }
    if anchor.z != 0 {
        wrapped = FixedVec2::new(position.x, wrap_coordinate(position.z));
    }

    wrapped
}

/// Yaw that makes a saucer spawned at `position` face into the arena.
pub fn saucer_yaw(position: FixedVec2) -> Fixed {
    if position.x > 0 {
        -SAUCER_FACING_YAW
    } else if position.x < 0 {
        SAUCER_FACING_YAW
    } else {
        0
    }
}
