//! Data-driven arena and physics configuration
//!
//! Defaults come from [`crate::consts`]. A tuning file is plain JSON; any
//! field left out keeps its default.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Side;

/// Errors raised while loading or validating a [`Tuning`]
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {}", e),
            TuningError::Parse(e) => write!(f, "malformed tuning file: {}", e),
            TuningError::Invalid(reason) => write!(f, "invalid tuning: {}", reason),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TuningError::Io(e) => Some(e),
            TuningError::Parse(e) => Some(e),
            TuningError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

/// Arena, paddle, ball and pacing parameters for one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: i32,
    pub arena_height: i32,
    pub paddle_width: i32,
    pub paddle_height: i32,
    /// Pixels per tick while a direction key is held
    pub paddle_speed: i32,
    pub ball_diameter: i32,
    pub ball_initial_speed: i32,
    pub ball_spawn_vy_range: i32,
    pub max_ball_velocity: i32,
    pub winning_score: u32,
    pub countdown_from: u32,
    pub countdown_step_ms: u64,
    pub tick_rate: u32,
    pub max_ticks_per_frame: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: GAME_WIDTH,
            arena_height: GAME_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            ball_diameter: BALL_DIAMETER,
            ball_initial_speed: BALL_INITIAL_SPEED,
            ball_spawn_vy_range: BALL_SPAWN_VY_RANGE,
            max_ball_velocity: MAX_BALL_VELOCITY,
            winning_score: WINNING_SCORE,
            countdown_from: COUNTDOWN_FROM,
            countdown_step_ms: COUNTDOWN_STEP_MS,
            tick_rate: TICK_RATE,
            max_ticks_per_frame: MAX_TICKS_PER_FRAME,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject parameter sets the simulation cannot honour
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.paddle_width <= 0 || self.paddle_height <= 0 || self.ball_diameter <= 0 {
            return Err(TuningError::Invalid("entity sizes must be positive"));
        }
        if self.arena_height <= self.paddle_height || self.arena_height <= self.ball_diameter {
            return Err(TuningError::Invalid("arena is shorter than a paddle or the ball"));
        }
        let min_width = self
            .paddle_width
            .checked_mul(2)
            .and_then(|w| w.checked_add(self.ball_diameter))
            .ok_or(TuningError::Invalid("paddle or ball width out of range"))?;
        if self.arena_width <= min_width {
            return Err(TuningError::Invalid("arena is too narrow for two paddles and a ball"));
        }
        if self.paddle_speed < 0 {
            return Err(TuningError::Invalid("paddle speed must not be negative"));
        }
        if self.ball_initial_speed <= 0 {
            return Err(TuningError::Invalid("ball must spawn with horizontal speed"));
        }
        if self.max_ball_velocity < self.ball_initial_speed {
            return Err(TuningError::Invalid("max ball velocity is below the spawn speed"));
        }
        if self.ball_spawn_vy_range < 0 || self.ball_spawn_vy_range > self.max_ball_velocity {
            return Err(TuningError::Invalid("spawn vertical range out of bounds"));
        }
        if self.winning_score == 0 {
            return Err(TuningError::Invalid("winning score must be at least 1"));
        }
        if self.countdown_from == 0 || self.countdown_step_ms == 0 {
            return Err(TuningError::Invalid("countdown must last at least one step"));
        }
        if self.tick_rate == 0 || self.max_ticks_per_frame == 0 {
            return Err(TuningError::Invalid("tick rate and per-frame cap must be positive"));
        }
        if self.tick_rate > MAX_TICK_RATE {
            return Err(TuningError::Invalid("tick rate above 1000 Hz"));
        }
        Ok(())
    }

    /// Top-left corner of the ball when centred in the arena
    pub fn ball_spawn(&self) -> IVec2 {
        IVec2::new(
            self.arena_width / 2 - self.ball_diameter / 2,
            self.arena_height / 2 - self.ball_diameter / 2,
        )
    }

    /// Top-left corner of a paddle at the start of a point
    pub fn paddle_spawn(&self, side: Side) -> IVec2 {
        let x = match side {
            Side::Left => 0,
            Side::Right => self.arena_width - self.paddle_width,
        };
        IVec2::new(x, self.arena_height / 2 - self.paddle_height / 2)
    }

    /// Lowest legal paddle Y (top edge)
    #[inline]
    pub fn max_paddle_y(&self) -> i32 {
        self.arena_height - self.paddle_height
    }

    /// Wall-clock length of one tick
    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.tick_rate as u64)
    }

    /// Simulated milliseconds elapsed after `ticks` ticks
    #[inline]
    pub fn ticks_to_ms(&self, ticks: u64) -> u64 {
        ticks * 1000 / self.tick_rate as u64
    }
}
