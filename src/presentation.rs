//! HUD Presentation
//!
//! Maps game events onto the host's text labels and life icons.

use crate::game::events::{GameEvent, GameEventData};

/// Label shown above the score.
pub const SCORE_LABEL: &str = "SCORE";
/// Text shown when the last life is lost.
pub const GAME_OVER_TEXT: &str = "GAME OVER!!";

/// Host-side HUD.
pub trait PresentationSink {
    /// Set the static score caption.
    fn set_score_label(&mut self, text: &str);
    /// Set the score number.
    fn set_score_points(&mut self, text: &str);
    /// Set the game-over banner (empty hides it).
    fn set_game_over_text(&mut self, text: &str);
    /// Hide life icon `slot` (1..=3).
    fn hide_life_indicator(&mut self, slot: u8);
}

/// Apply every HUD-relevant event to `sink`, in order.
pub fn present<S: PresentationSink + ?Sized>(events: &[GameEvent], sink: &mut S) {
    for event in events {
        match &event.data {
            GameEventData::SessionStarted { .. } => {
                sink.set_score_label(SCORE_LABEL);
                sink.set_score_points("0");
                sink.set_game_over_text("");
            }
            GameEventData::ScoreChanged { total, .. } => {
                sink.set_score_points(&total.to_string());
            }
            GameEventData::PlayerDied { hidden_indicator, .. } => {
                sink.hide_life_indicator(*hidden_indicator);
            }
            GameEventData::GameOver { .. } => {
                sink.set_game_over_text(GAME_OVER_TEXT);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Hud {
        label: String,
        points: String,
        banner: String,
        hidden: Vec<u8>,
    }

    impl PresentationSink for Hud {
        fn set_score_label(&mut self, text: &str) {
            self.label = text.to_string();
        }
        fn set_score_points(&mut self, text: &str) {
            self.points = text.to_string();
        }
        fn set_game_over_text(&mut self, text: &str) {
            self.banner = text.to_string();
        }
        fn hide_life_indicator(&mut self, slot: u8) {
            self.hidden.push(slot);
        }
    }

    #[test]
    fn test_session_hud() {
        let events = vec![
            GameEvent::session_started(0, 3),
            GameEvent::score_changed(150, 10, 10),
            GameEvent::player_died(200, 0, 3, 2),
            GameEvent::score_changed(400, 50, 60),
            GameEvent::player_died(500, 5, 2, 1),
            GameEvent::player_died(800, 9, 1, 0),
            GameEvent::game_over(800, 60),
        ];

        let mut hud = Hud::default();
        present(&events, &mut hud);

        assert_eq!(hud.label, "SCORE");
        assert_eq!(hud.points, "60");
        assert_eq!(hud.banner, "GAME OVER!!");
        assert_eq!(hud.hidden, vec![3, 2, 1]);
    }

    #[test]
    fn test_start_resets_hud() {
        let mut hud = Hud {
            banner: "stale".to_string(),
            ..Hud::default()
        };
        present(&[GameEvent::session_started(0, 3)], &mut hud);
        assert_eq!(hud.points, "0");
        assert_eq!(hud.banner, "");
    }
}
