//! Control Input
//!
//! The rules only care about two buttons: fire and shield. Steering and
//! thrust belong to the host's physics and never reach this crate.

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::game::bounds::PlaygroundBounds;
use crate::game::state::{EntityId, GameState};
use crate::game::tick::{Contact, TickFrame, TransformSync, WrapCrossing};

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Buttons held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Action flags (packed bits):
    /// - Bit 0: Fire held
    /// - Bit 1: Shield held
    /// - Bit 2-7: Reserved
    pub flags: u8,
}

impl InputFrame {
    /// Fire flag bit
    pub const FLAG_FIRE: u8 = 0x01;

    /// Shield flag bit
    pub const FLAG_SHIELD: u8 = 0x02;

    /// No buttons held.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Frame with only fire held.
    pub const fn fire() -> Self {
        Self { flags: Self::FLAG_FIRE }
    }

    /// Frame with only shield held.
    pub const fn shield() -> Self {
        Self { flags: Self::FLAG_SHIELD }
    }

    /// Is fire held?
    #[inline]
    pub fn fire_held(&self) -> bool {
        self.flags & Self::FLAG_FIRE != 0
    }

    /// Is shield held?
    #[inline]
    pub fn shield_held(&self) -> bool {
        self.flags & Self::FLAG_SHIELD != 0
    }

    /// No buttons held.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }

    /// Set fire flag.
    #[inline]
    pub fn set_fire(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_FIRE;
        } else {
            self.flags &= !Self::FLAG_FIRE;
        }
    }

    /// Set shield flag.
    #[inline]
    pub fn set_shield(&mut self, held: bool) {
        if held {
            self.flags |= Self::FLAG_SHIELD;
        } else {
            self.flags &= !Self::FLAG_SHIELD;
        }
    }
}

/// Input change at a given tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Tick when this input state began
    pub tick: u32,
    /// The new input state
    pub frame: InputFrame,
}

// =============================================================================
// SESSION RECORDING
// =============================================================================

/// Host observations of one tick: everything in a frame except the buttons.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostReport {
    /// Tick the report belongs to
    pub tick: u32,
    /// Moved entities
    pub transforms: Vec<TransformSync>,
    /// Outer boundary departures
    pub departures: Vec<EntityId>,
    /// Wrap boundary crossings
    pub wraps: Vec<WrapCrossing>,
    /// Contacts
    pub contacts: Vec<Contact>,
}

impl HostReport {
    fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.departures.is_empty()
            && self.wraps.is_empty()
            && self.contacts.is_empty()
    }
}

/// Every frame fed to a session, compact enough to store and replay.
///
/// Buttons are stored only where they change; host reports only on ticks
/// where the host saw something. With the seed and the config this
/// rebuilds the exact frame sequence the session ran on.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecording {
    /// Session identifier
    pub session_id: Uuid,

    /// RNG seed used for this session
    pub rng_seed: u64,

    /// Arena the session ran in
    pub bounds: PlaygroundBounds,

    /// Tick of the first recorded frame
    pub start_tick: u32,

    /// Tick of the last recorded frame
    pub end_tick: u32,

    /// Number of frames recorded
    pub frame_count: u32,

    deltas: Vec<InputDelta>,

    reports: Vec<HostReport>,

    #[serde(skip)]
    last_frame: InputFrame,
}

impl SessionRecording {
    /// Start an empty recording.
    pub fn new(session_id: Uuid, rng_seed: u64, bounds: PlaygroundBounds) -> Self {
        Self {
            session_id,
            rng_seed,
            bounds,
            start_tick: 0,
            end_tick: 0,
            frame_count: 0,
            deltas: Vec::new(),
            reports: Vec::new(),
            last_frame: InputFrame::new(),
        }
    }

    /// Start recording a freshly created session.
    pub fn for_session(state: &GameState) -> Self {
        Self::new(state.session_id, state.rng_seed, state.bounds)
    }

    /// Record the frame that ran as `tick`. Ticks must increase.
    pub fn record(&mut self, tick: u32, frame: &TickFrame) {
        if self.is_empty() {
            self.start_tick = tick;
        }
        self.end_tick = tick;
        self.frame_count += 1;

        if frame.input != self.last_frame {
            self.deltas.push(InputDelta { tick, frame: frame.input });
            self.last_frame = frame.input;
        }

        let report = HostReport {
            tick,
            transforms: frame.transforms.clone(),
            departures: frame.departures.clone(),
            wraps: frame.wraps.clone(),
            contacts: frame.contacts.clone(),
        };
        if !report.is_empty() {
            self.reports.push(report);
        }
    }

    /// Nothing recorded yet.
    pub fn is_empty(&self) -> bool {
        self.frame_count == 0
    }

    /// Buttons held at `tick`.
    pub fn input_at(&self, tick: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.tick <= tick);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].frame
        }
    }

    /// Full frame that ran as `tick`.
    pub fn frame_at(&self, tick: u32) -> TickFrame {
        let mut frame = TickFrame::with_input(self.input_at(tick));
        if let Ok(idx) = self.reports.binary_search_by_key(&tick, |r| r.tick) {
            let report = &self.reports[idx];
            frame.transforms = report.transforms.clone();
            frame.departures = report.departures.clone();
            frame.wraps = report.wraps.clone();
            frame.contacts = report.contacts.clone();
        }
        frame
    }

    /// Stored button changes.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Stored host reports.
    pub fn reports(&self) -> &[HostReport] {
        &self.reports
    }

    /// Expand into one frame per tick, `start_tick..=end_tick`.
    pub fn frames(&self) -> Vec<TickFrame> {
        if self.is_empty() {
            return Vec::new();
        }
        (self.start_tick..=self.end_tick).map(|t| self.frame_at(t)).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
