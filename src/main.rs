//! Ping Pong headless entry point
//!
//! Runs the game loop against a scripted keyboard and streams JSON
//! snapshots to stdout, one per line.
//!
//! Environment:
//! - `PONG_TUNING`: path to a JSON tuning file
//! - `PONG_SETTINGS`: path to a JSON settings file
//! - `PONG_SEED`: RNG seed (defaults to the current time)
//! - `PONG_FRAMES`: number of frames to simulate (default 3600)
//! - `PONG_REALTIME`: when `1` or `true`, pace frames with the wall clock
//!   instead of simulating as fast as possible
//! - `RUST_LOG`: log filter for `env_logger`

use std::io::StdoutLock;
use std::path::Path;

use ping_pong::audio::{LogBackend, Mixer};
use ping_pong::render::JsonLinesRenderer;
use ping_pong::sim::GameState;
use ping_pong::{
    Clock, GameLoop, Key, KeyboardState, LoopControl, ManualClock, Settings, SystemClock, Tuning,
};

const DEFAULT_FRAMES: u64 = 3600;
/// Write a snapshot at least this often (in ticks)
const SNAPSHOT_EVERY: u64 = 30;

type Game<C> = GameLoop<C, KeyboardState, Mixer<LogBackend>, JsonLinesRenderer<StdoutLock<'static>>>;

fn main() {
    env_logger::init();
    log::info!("Ping Pong (headless) starting...");

    let tuning = load_tuning();
    let settings = std::env::var("PONG_SETTINGS")
        .map(|path| Settings::load(Path::new(&path)))
        .unwrap_or_default();
    let seed = env_u64("PONG_SEED").unwrap_or_else(time_seed);
    let frames = env_u64("PONG_FRAMES").unwrap_or(DEFAULT_FRAMES);
    let realtime = std::env::var("PONG_REALTIME")
        .map(|v| matches!(v.trim(), "1" | "true"))
        .unwrap_or(false);

    let mut script = Script::default();
    if realtime {
        log::info!("Real-time mode, {} frames", frames);
        let mut game = new_game(SystemClock::new(), tuning, &settings, seed);
        game.run(Some(frames), |frame, kb| script.drive(frame, kb));
        report(game.state());
    } else {
        let step = tuning.tick_duration();
        let mut game = new_game(ManualClock::new(), tuning, &settings, seed);
        for frame in 0..frames {
            script.drive(frame, game.input_mut());
            game.clock_mut().advance(step);
            if game.frame() == LoopControl::Exit {
                break;
            }
        }
        report(game.state());
    }
}

fn new_game<C: Clock>(clock: C, tuning: Tuning, settings: &Settings, seed: u64) -> Game<C> {
    GameLoop::new(
        GameState::new(tuning, seed),
        clock,
        KeyboardState::new(),
        Mixer::with_settings(Some(LogBackend), settings),
        JsonLinesRenderer::new(std::io::stdout().lock(), SNAPSHOT_EVERY),
    )
}

fn report(state: &GameState) {
    log::info!(
        "Stopped after {} ticks in {}: {} - {}",
        state.time_ticks,
        state.phase.name(),
        state.score.player1,
        state.score.player2
    );
}

fn load_tuning() -> Tuning {
    let Ok(path) = std::env::var("PONG_TUNING") else {
        return Tuning::default();
    };
    match Tuning::load(Path::new(&path)) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("{}, using default tuning", e);
            Tuning::default()
        }
    }
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring {}={:?}: {}", name, raw, e);
            None
        }
    }
}

fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Scripted keyboard: start a match from the menu, then sweep both paddles
/// up and down at different rates. Space is tapped now and then to start a
/// new match once one ends.
#[derive(Default)]
struct Script {
    left_up: Option<bool>,
    right_up: Option<bool>,
}

impl Script {
    /// Frame at which the paddles start moving (after the countdown)
    const PLAY_FROM: u64 = 240;
    const LEFT_PERIOD: u64 = 40;
    const RIGHT_PERIOD: u64 = 55;
    const SPACE_EVERY: u64 = 600;

    fn drive(&mut self, frame: u64, kb: &mut KeyboardState) {
        match frame {
            0 => kb.key_down(Key::Enter),
            1 => kb.key_up(Key::Enter),
            _ => {}
        }
        if frame < Self::PLAY_FROM {
            return;
        }

        let t = frame - Self::PLAY_FROM;
        let left_up = (t / Self::LEFT_PERIOD) % 2 == 1;
        let right_up = (t / Self::RIGHT_PERIOD) % 2 == 0;
        if self.left_up != Some(left_up) {
            hold(kb, (Key::W, Key::S), left_up);
            self.left_up = Some(left_up);
        }
        if self.right_up != Some(right_up) {
            hold(kb, (Key::Up, Key::Down), right_up);
            self.right_up = Some(right_up);
        }

        match t % Self::SPACE_EVERY {
            0 if t > 0 => kb.key_down(Key::Space),
            1 => kb.key_up(Key::Space),
            _ => {}
        }
    }
}

fn hold(kb: &mut KeyboardState, (up, down): (Key, Key), going_up: bool) {
    if going_up {
        kb.key_up(down);
        kb.key_down(up);
    } else {
        kb.key_up(up);
        kb.key_down(down);
    }
}
