//! Game state and core simulation types
//!
//! Everything the loop mutates per tick lives in [`GameState`].

use std::fmt;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::phase::GamePhase;
use crate::tuning::Tuning;

/// Which edge of the arena a paddle defends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    Player1,
    Player2,
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Player1 => f.write_str("Player 1"),
            PlayerId::Player2 => f.write_str("Player 2"),
        }
    }
}

/// Vertical movement intent for a paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    #[default]
    Stop,
}

/// A player's paddle
///
/// The paddle knows nothing about the arena; keeping it inside the bounds is
/// the collision pass's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    pub velocity_y: i32,
    pub side: Side,
    /// Pixels per tick while moving
    pub speed: i32,
}

impl Paddle {
    /// Create a stationary paddle at its spawn point
    pub fn spawn(side: Side, tuning: &Tuning) -> Self {
        Self {
            rect: Rect::new(
                tuning.paddle_spawn(side),
                IVec2::new(tuning.paddle_width, tuning.paddle_height),
            ),
            velocity_y: 0,
            side,
            speed: tuning.paddle_speed,
        }
    }

    pub fn set_intent(&mut self, direction: Direction) {
        self.velocity_y = match direction {
            Direction::Up => -self.speed,
            Direction::Down => self.speed,
            Direction::Stop => 0,
        };
    }

    /// Apply one tick of velocity (unclamped)
    #[inline]
    pub fn advance(&mut self) {
        self.rect.pos.y += self.velocity_y;
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    pub vel: IVec2,
}

impl Ball {
    /// Create a ball at the arena centre heading toward a random side.
    ///
    /// Horizontal speed is always `±ball_initial_speed`, never zero; vertical
    /// speed is uniform over `-ball_spawn_vy_range..=ball_spawn_vy_range`.
    pub fn spawn<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        let vx = if rng.random_bool(0.5) {
            tuning.ball_initial_speed
        } else {
            -tuning.ball_initial_speed
        };
        let range = tuning.ball_spawn_vy_range;
        let vy = rng.random_range(-range..=range);
        debug_assert!(vx != 0, "ball must always move horizontally");

        Self {
            rect: Rect::new(
                tuning.ball_spawn(),
                IVec2::new(tuning.ball_diameter, tuning.ball_diameter),
            ),
            vel: IVec2::new(vx, vy),
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.rect.pos += self.vel;
    }

    pub fn bounce_vertical(&mut self) {
        self.vel.y = -self.vel.y;
    }

    /// Return the ball off a paddle.
    ///
    /// Horizontal speed ratchets up by one per hit (capped at `max_velocity`)
    /// and always points away from the struck paddle. Vertical speed depends
    /// only on where the ball met the paddle: the centre sends it straight,
    /// the ends send it off at up to `max_velocity`. A hit above the paddle
    /// centre sends the ball downward, and one below sends it upward.
    pub fn deflect_off(&mut self, paddle: &Paddle, max_velocity: i32) {
        let speed = (self.vel.x.abs() + 1).min(max_velocity);
        self.vel.x = match paddle.side {
            Side::Left => speed,
            Side::Right => -speed,
        };

        let half_height = (paddle.rect.height() / 2).max(1);
        let offset = paddle.rect.center_y() - self.rect.center_y();
        let vy = (offset as f32 / half_height as f32 * max_velocity as f32) as i32;
        self.vel.y = vy.clamp(-max_velocity, max_velocity);
    }
}

/// Points per player for the current match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

impl Score {
    pub fn increment(&mut self, player: PlayerId) {
        match player {
            PlayerId::Player1 => self.player1 += 1,
            PlayerId::Player2 => self.player2 += 1,
        }
    }

    pub fn get(&self, player: PlayerId) -> u32 {
        match player {
            PlayerId::Player1 => self.player1,
            PlayerId::Player2 => self.player2,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// First player at or past `threshold`, if any
    pub fn winner(&self, threshold: u32) -> Option<PlayerId> {
        if self.player1 >= threshold {
            Some(PlayerId::Player1)
        } else if self.player2 >= threshold {
            Some(PlayerId::Player2)
        } else {
            None
        }
    }
}

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball bounced off the top or bottom wall
    WallBounce,
    /// Ball was returned by the paddle on this side
    PaddleHit(Side),
    /// Ball left the arena; this player gets the point
    PointScored(PlayerId),
    /// Phase moved from one state to another
    PhaseChanged { from: GamePhase, to: GamePhase },
    /// This player reached the winning score
    MatchWon(PlayerId),
}

/// Complete game state, owned and mutated only by the tick
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for ball spawn randomness
    pub seed: u64,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    pub score: Score,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Create a fresh game sitting in the main menu
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let ball = Ball::spawn(&tuning, &mut rng);
        Self {
            seed,
            left: Paddle::spawn(Side::Left, &tuning),
            right: Paddle::spawn(Side::Right, &tuning),
            ball,
            score: Score::default(),
            phase: GamePhase::default(),
            time_ticks: 0,
            events: Vec::new(),
            tuning,
            rng,
        }
    }

    /// Simulated milliseconds since the game was created
    pub fn now_ms(&self) -> u64 {
        self.tuning.ticks_to_ms(self.time_ticks)
    }

    pub fn paddle_mut(&mut self, side: Side) -> &mut Paddle {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Put both paddles back at their spawn points and serve a new ball
    pub fn respawn_entities(&mut self) {
        self.left = Paddle::spawn(Side::Left, &self.tuning);
        self.right = Paddle::spawn(Side::Right, &self.tuning);
        self.ball = Ball::spawn(&self.tuning, &mut self.rng);
    }

    /// Start a new match: zero the score and respawn everything
    pub fn reset_match(&mut self) {
        self.score.reset();
        self.respawn_entities();
    }

    /// Replace the phase, recording the change if it is a different phase
    pub fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        if from.differs_from(&to) {
            self.events.push(GameEvent::PhaseChanged { from, to });
        }
    }
}
