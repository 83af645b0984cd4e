//! Headless Asteroids Session
//!
//! Plays a scripted session against the rules with a crude stand-in for
//! the host's physics, then replays the session recording to check the
//! final state hash.
//!
//! Configuration comes from the environment (see `config`); an optional
//! first argument names a file that receives the session recording and
//! every event as JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use asteroids_rules::{
    TICK_RATE, VERSION,
    config::GameConfig,
    core::fixed::{fixed_abs, from_int, to_fixed, Fixed},
    core::vec2::FixedVec2,
    game::{
        bounds::ArenaEdge,
        events::{GameEvent, GameEventData},
        input::{InputFrame, SessionRecording},
        state::{EntityId, EntityKind, GameState},
        tick::{replay_recording, tick, TickFrame},
    },
    presentation::{present, PresentationSink},
};

/// Hard stop for sessions that never end.
const MAX_TICKS: u32 = TICK_RATE * 180;

/// One tick of travel: 1/60 s as Fixed.
const TICK_DT: Fixed = 1092;

/// Distance past the wrap line where the destroy boundary sits.
const DESTROY_MARGIN: Fixed = from_int(4);

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Asteroids Rules v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = GameConfig::from_env().context("loading configuration")?;
    let dump_path = std::env::args().nth(1);

    demo_session(&config, dump_path.as_deref())
}

/// What the optional dump file holds.
#[derive(Serialize)]
struct SessionDump<'a> {
    recording: &'a SessionRecording,
    events: &'a [GameEvent],
}

/// HUD that writes to the log.
struct LogHud;

impl PresentationSink for LogHud {
    fn set_score_label(&mut self, text: &str) {
        debug!("hud label: {}", text);
    }

    fn set_score_points(&mut self, text: &str) {
        info!("score: {}", text);
    }

    fn set_game_over_text(&mut self, text: &str) {
        if !text.is_empty() {
            info!("{}", text);
        }
    }

    fn hide_life_indicator(&mut self, slot: u8) {
        info!("life indicator {} hidden", slot);
    }
}

/// Run a scripted session and verify it by replay.
fn demo_session(config: &GameConfig, dump_path: Option<&str>) -> Result<()> {
    info!("=== Starting Demo Session ===");

    let session_id = Uuid::new_v4();
    let mut state = GameState::new(session_id, config, None);

    info!("Session ID: {}", hex::encode(session_id.as_bytes()));
    info!("RNG Seed: {}", config.rng_seed);
    let (max_x, max_z) = FixedVec2::new(state.bounds.max_x, state.bounds.max_z).to_floats();
    info!("Arena: {:.1} x {:.1}", max_x * 2.0, max_z * 2.0);

    let mut hud = LogHud;
    let mut all_events: Vec<GameEvent> = Vec::new();
    let mut recording = SessionRecording::for_session(&state);

    while state.tick < MAX_TICKS {
        let frame = scripted_frame(&state);
        let result = tick(&mut state, &frame, config);
        recording.record(state.tick, &frame);

        present(&result.events, &mut hud);
        log_events(&result.events);
        all_events.extend(result.events);

        if state.tick % (TICK_RATE * 10) == 0 {
            info!(
                "Tick {}: {} entities, score {}, lives {}",
                state.tick,
                state.entities.len(),
                state.score.points(),
                state.lives.lives()
            );
        }

        if result.game_over {
            info!("Session ended at tick {}", state.tick);
            break;
        }
    }

    info!("=== Session Results ===");
    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));
    info!("Final Score: {}", state.score.points());
    info!("Total events: {}", all_events.len());
    info!(
        "Recorded {} frames: {} input changes, {} host reports",
        recording.frame_count,
        recording.deltas().len(),
        recording.reports().len()
    );

    if let Some(path) = dump_path {
        let dump = SessionDump {
            recording: &recording,
            events: &all_events,
        };
        let json = serde_json::to_string_pretty(&dump).context("serializing events")?;
        std::fs::write(path, json).with_context(|| format!("writing events to {}", path))?;
        info!("Events written to {}", path);
    }

    info!("=== Verifying Determinism ===");
    let (replay_final, replay_events) = replay_recording(&recording, config);
    let replay_hash = replay_final.compute_hash();

    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash == replay_hash && replay_events.len() == all_events.len() {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match &event.data {
            GameEventData::PlayerDied { lives_left, .. } => {
                info!("Tick {}: player destroyed, {} lives left", event.tick, lives_left);
            }
            GameEventData::ShieldActivated { automatic, .. } => {
                debug!("Tick {}: shield up (automatic: {})", event.tick, automatic);
            }
            GameEventData::DeathAbsorbed { .. } => {
                info!("Tick {}: shield absorbed a hit", event.tick);
            }
            GameEventData::PlayerWrapped { position, .. } => {
                debug!("Tick {}: player wrapped to {}", event.tick, position);
            }
            _ => {}
        }
    }
}

/// Stand-in for the host: moves threats and bolts along their velocity,
/// removes those that drift out, and scripts a few contacts.
fn scripted_frame(state: &GameState) -> TickFrame {
    let next_tick = state.tick + 1;

    let mut input = InputFrame::new();
    input.set_fire(true);
    input.set_shield(next_tick % 900 == 450);
    let mut frame = TickFrame::with_input(input);

    let limit_x = state.bounds.max_x + DESTROY_MARGIN;
    let limit_z = state.bounds.max_z + DESTROY_MARGIN;

    for entity in state.entities.values() {
        if entity.kind == EntityKind::Player || entity.velocity == FixedVec2::ZERO {
            continue;
        }
        let position = entity.position + entity.velocity.scale(TICK_DT);
        if fixed_abs(position.x) > limit_x || fixed_abs(position.z) > limit_z {
            frame = frame.departure(entity.id);
        } else {
            frame = frame.transform(entity.id, position, entity.yaw);
        }
    }

    let player = state.player.map(|p| p.entity);
    let oldest = |kind: EntityKind| -> Option<EntityId> {
        state.entities.values().find(|e| e.kind == kind).map(|e| e.id)
    };

    // Bolts find the oldest asteroid every 3/4 s
    if next_tick % 45 == 0 {
        if let (Some(bolt), Some(rock)) = (oldest(EntityKind::PlayerProjectile), oldest(EntityKind::Asteroid)) {
            frame = frame.contact_pair((rock, EntityKind::Asteroid), (bolt, EntityKind::PlayerProjectile));
        }
    }

    // And the saucer every 12 s
    if next_tick % 720 == 0 {
        if let (Some(bolt), Some(saucer)) = (oldest(EntityKind::PlayerProjectile), oldest(EntityKind::Saucer)) {
            frame = frame.contact_pair((saucer, EntityKind::Saucer), (bolt, EntityKind::PlayerProjectile));
        }
    }

    // An asteroid rams the ship every 7 s
    if next_tick % 420 == 0 {
        if let (Some(ship), Some(rock)) = (player, oldest(EntityKind::Asteroid)) {
            frame = frame.contact_pair((rock, EntityKind::Asteroid), (ship, EntityKind::Player));
        }
    }

    // The ship drifts over the right edge every 5 s
    if next_tick % 300 == 0 {
        if let Some(ship) = player {
            let edge = FixedVec2::new(state.bounds.max_x + to_fixed(0.5), 0);
            frame = frame
                .transform(ship, edge, 0)
                .wrap(ship, ArenaEdge::Right.anchor(&state.bounds));
        }
    }

    frame
}
