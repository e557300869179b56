//! Ping Pong - a two-player Pong engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (paddles, ball, collisions, game phases)
//! - `runner`: Fixed timestep game loop with an injectable clock
//! - `input`: Keyboard state, read once per tick
//! - `audio`: Sound port and volume mixer
//! - `render`: Renderer port and snapshot sinks
//! - `tuning`: Data-driven arena and physics configuration
//! - `settings`: Player preferences (audio levels)

pub mod audio;
pub mod input;
pub mod render;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioPort, Mixer, MusicTrack, SoundId};
pub use input::{InputPort, Key, KeyboardState};
pub use render::Renderer;
pub use runner::{Clock, GameLoop, LoopControl, ManualClock, SystemClock};
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
    /// Fastest tick rate a tuning file may ask for
    pub const MAX_TICK_RATE: u32 = 1000;
    /// Maximum ticks drained per frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 8;

    /// Arena dimensions
    pub const GAME_WIDTH: i32 = 1000;
    pub const GAME_HEIGHT: i32 = (GAME_WIDTH as f64 * 0.55555) as i32;

    /// Paddle defaults
    pub const PADDLE_WIDTH: i32 = 25;
    pub const PADDLE_HEIGHT: i32 = 100;
    pub const PADDLE_SPEED: i32 = 10;

    /// Ball defaults
    pub const BALL_DIAMETER: i32 = 20;
    pub const BALL_INITIAL_SPEED: i32 = 2;
    /// Spawn vertical speed is drawn from `-RANGE..=RANGE`
    pub const BALL_SPAWN_VY_RANGE: i32 = 2;
    /// Cap on either velocity component after a paddle hit
    pub const MAX_BALL_VELOCITY: i32 = 10;

    /// First to this many points wins
    pub const WINNING_SCORE: u32 = 5;

    /// Countdown before a match (3, 2, 1)
    pub const COUNTDOWN_FROM: u32 = 3;
    pub const COUNTDOWN_STEP_MS: u64 = 1000;
}
