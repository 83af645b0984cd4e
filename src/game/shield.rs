//! Shield / Invulnerability Timer
//!
//! `Ready -> Active -> Cooldown -> Ready`. While active the player cannot
//! die. A fresh ship starts `Ready`.

use serde::{Serialize, Deserialize};

use crate::core::timer::{millis_to_ticks, Countdown};

/// Shield durations, in ticks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldConfig {
    /// How long the shield stays up
    pub active_ticks: u32,
    /// How long after expiry before a manual activation is accepted
    pub cooldown_ticks: u32,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            active_ticks: millis_to_ticks(2209),  // Length of the shield sound clip
            cooldown_ticks: millis_to_ticks(2500),
        }
    }
}

/// Current shield phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ShieldPhase {
    /// Can be activated
    #[default]
    Ready = 0,
    /// Protecting the player
    Active = 1,
    /// Recently expired, manual activation refused
    Cooldown = 2,
}

/// Outcome of an activation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShieldActivation {
    /// Shield went up
    Activated,
    /// Already up; nothing changed
    AlreadyActive,
    /// Still cooling down; request refused
    Refused,
}

/// Phase change reported by [`ShieldTimer::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShieldTransition {
    /// Active window ended, cooldown started
    Expired,
    /// Cooldown ended
    Recharged,
}

/// Per-ship shield state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldTimer {
    phase: ShieldPhase,
    countdown: Countdown,
}

impl ShieldTimer {
    /// A ready shield.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> ShieldPhase {
        self.phase
    }

    /// Is the shield up?
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == ShieldPhase::Active
    }

    /// Ticks left in the current active or cooldown window.
    pub fn remaining(&self) -> Option<u32> {
        self.countdown.remaining()
    }

    /// Player-requested activation. Refused while cooling down.
    pub fn activate(&mut self, config: &ShieldConfig) -> ShieldActivation {
        match self.phase {
            ShieldPhase::Active => ShieldActivation::AlreadyActive,
            ShieldPhase::Cooldown => ShieldActivation::Refused,
            ShieldPhase::Ready => {
                self.raise(config);
                ShieldActivation::Activated
            }
        }
    }

    /// Automatic activation (after a respawn). Only skipped while already
    /// active; a pending cooldown is cut short.
    pub fn force_activate(&mut self, config: &ShieldConfig) -> ShieldActivation {
        if self.is_active() {
            return ShieldActivation::AlreadyActive;
        }
        self.raise(config);
        ShieldActivation::Activated
    }

    fn raise(&mut self, config: &ShieldConfig) {
        self.phase = ShieldPhase::Active;
        self.countdown = Countdown::start(config.active_ticks);
    }

    /// Advance one tick.
    pub fn advance(&mut self, config: &ShieldConfig) -> Option<ShieldTransition> {
        if !self.countdown.advance() {
            return None;
        }

        match self.phase {
            ShieldPhase::Active => {
                self.phase = ShieldPhase::Cooldown;
                self.countdown = Countdown::start(config.cooldown_ticks);
                Some(ShieldTransition::Expired)
            }
            ShieldPhase::Cooldown => {
                self.phase = ShieldPhase::Ready;
                Some(ShieldTransition::Recharged)
            }
            ShieldPhase::Ready => None,
        }
    }
}
