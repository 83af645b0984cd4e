//! Score and Lives
//!
//! `Alive(3) -> Alive(2) -> Alive(1) -> GameOver`. Each death hides one
//! life indicator; the last one ends the session for good.

use serde::{Serialize, Deserialize};

use crate::core::timer::millis_to_ticks;

/// Lives at the start of a session.
pub const STARTING_LIVES: u8 = 3;

/// Ticks between a non-final death and the next ship (2 s).
pub const DEFAULT_RESPAWN_DELAY_TICKS: u32 = millis_to_ticks(2000);

/// Lives state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LivesState {
    /// Playing with `lives` remaining (1..=3)
    Alive {
        /// Lives left, including the current ship
        lives: u8,
    },
    /// Terminal
    GameOver,
}

impl Default for LivesState {
    fn default() -> Self {
        Self::Alive { lives: STARTING_LIVES }
    }
}

/// What a death notification changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathOutcome {
    /// A life was lost; a new ship follows after the respawn delay
    Respawn {
        /// Indicator slot to hide (3, 2)
        hidden_indicator: u8,
        /// Lives left
        lives_left: u8,
    },
    /// The last life was lost
    GameOver {
        /// Indicator slot to hide (1)
        hidden_indicator: u8,
    },
    /// Already over; nothing changed
    Ignored,
}

impl LivesState {
    /// Three lives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lives remaining (0 after game over).
    pub fn lives(&self) -> u8 {
        match self {
            LivesState::Alive { lives } => *lives,
            LivesState::GameOver => 0,
        }
    }

    /// Has the session ended?
    #[inline]
    pub fn is_game_over(&self) -> bool {
        matches!(self, LivesState::GameOver)
    }

    /// Register a player death.
    pub fn on_player_death(&mut self) -> DeathOutcome {
        let previous = match *self {
            LivesState::GameOver => return DeathOutcome::Ignored,
            LivesState::Alive { lives } => lives,
        };

        if previous <= 1 {
            *self = LivesState::GameOver;
            DeathOutcome::GameOver { hidden_indicator: previous }
        } else {
            let lives_left = previous - 1;
            *self = LivesState::Alive { lives: lives_left };
            DeathOutcome::Respawn { hidden_indicator: previous, lives_left }
        }
    }
}

/// Accumulated points. Only ever grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    points: u32,
}

impl Scoreboard {
    /// Zero points.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current total.
    pub fn points(&self) -> u32 {
        self.points
    }

    /// Add points, saturating. Returns the new total.
    pub fn award(&mut self, amount: u32) -> u32 {
        self.points = self.points.saturating_add(amount);
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_deaths_end_session() {
        let mut lives = LivesState::new();
        assert_eq!(lives.lives(), 3);

        assert_eq!(
            lives.on_player_death(),
            DeathOutcome::Respawn { hidden_indicator: 3, lives_left: 2 }
        );
        assert_eq!(
            lives.on_player_death(),
            DeathOutcome::Respawn { hidden_indicator: 2, lives_left: 1 }
        );
        assert_eq!(lives.on_player_death(), DeathOutcome::GameOver { hidden_indicator: 1 });

        assert!(lives.is_game_over());
        assert_eq!(lives.lives(), 0);
    }

    #[test]
    fn test_death_after_game_over_ignored() {
        let mut lives = LivesState::GameOver;
        assert_eq!(lives.on_player_death(), DeathOutcome::Ignored);
        assert!(lives.is_game_over());
    }

    #[test]
    fn test_score_is_additive() {
        let mut score = Scoreboard::new();
        assert_eq!(score.award(10), 10);
        assert_eq!(score.award(0), 10);
        assert_eq!(score.award(50), 60);
    }

    #[test]
    fn test_score_saturates() {
        let mut score = Scoreboard { points: u32::MAX - 5 };
        assert_eq!(score.award(100), u32::MAX);
    }

    #[test]
    fn test_respawn_delay() {
        assert_eq!(DEFAULT_RESPAWN_DELAY_TICKS, 120);
    }
}
