//! Fixed timestep simulation tick
//!
//! One call advances the game by exactly one tick: apply the pending input
//! event, step the countdown, then (while playing) move, collide and check
//! for a winner.

use super::collision;
use super::phase::{GamePhase, MenuEvent, Transition};
use super::state::{Direction, GameEvent, GameState, Side};
use crate::audio::{AudioPort, MusicTrack, SoundId};

/// Input for a single tick, read from the keyboard snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held direction for Player 1 (left paddle)
    pub left: Direction,
    /// Held direction for Player 2 (right paddle)
    pub right: Direction,
    /// At most one discrete event per tick
    pub event: Option<MenuEvent>,
}

impl TickInput {
    pub fn event(event: MenuEvent) -> Self {
        Self {
            event: Some(event),
            ..Default::default()
        }
    }

    pub fn direction(&self, side: Side) -> Direction {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }
}

/// Whether the host should keep running after this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// Exit was confirmed in the menu
    Exit,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioPort) -> TickOutcome {
    state.events.clear();
    state.time_ticks += 1;
    let now_ms = state.now_ms();

    if let Some(event) = input.event {
        if apply_event(state, event, now_ms, audio) == TickOutcome::Exit {
            return TickOutcome::Exit;
        }
    }

    match state.phase {
        GamePhase::Countdown { .. } => {
            let from = state.phase;
            if state
                .phase
                .advance_countdown(now_ms, state.tuning.countdown_step_ms)
            {
                state.events.push(GameEvent::PhaseChanged {
                    from,
                    to: state.phase,
                });
                audio.play_music(MusicTrack::Game);
                log::info!("Countdown finished, match on");
            }
        }
        phase if phase.is_simulating() => step_match(state, input, audio),
        // Menu, Paused and GameOver are frozen
        _ => {}
    }

    TickOutcome::Continue
}

fn apply_event(
    state: &mut GameState,
    event: MenuEvent,
    now_ms: u64,
    audio: &mut dyn AudioPort,
) -> TickOutcome {
    let from = state.phase;
    let transition = state
        .phase
        .on_event(event, now_ms, state.tuning.countdown_from);

    match transition {
        Transition::Ignored | Transition::ShowControls => {}
        Transition::Selected(_) | Transition::Paused | Transition::Resumed => {
            audio.play(SoundId::ButtonClick);
        }
        Transition::StartCountdown => {
            audio.stop_music();
            audio.play(SoundId::BallBounceTransition);
            log::info!("Countdown started");
        }
        Transition::Restarted => {
            state.reset_match();
            audio.play(SoundId::ButtonClick);
            audio.play_music(MusicTrack::Game);
            log::info!("New match (seed {})", state.seed);
        }
        Transition::Exit => {
            audio.stop_music();
            log::info!("Exit selected");
            return TickOutcome::Exit;
        }
    }

    if from.differs_from(&state.phase) {
        log::info!("{} -> {}", from.name(), state.phase.name());
        state.events.push(GameEvent::PhaseChanged {
            from,
            to: state.phase,
        });
    }
    TickOutcome::Continue
}

/// Move, collide and check for a winner
fn step_match(state: &mut GameState, input: &TickInput, audio: &mut dyn AudioPort) {
    for side in [Side::Left, Side::Right] {
        let paddle = state.paddle_mut(side);
        paddle.set_intent(input.direction(side));
        paddle.advance();
    }
    state.ball.advance();

    collision::resolve(state);

    let hits = state
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::PaddleHit(_)))
        .count();
    for _ in 0..hits {
        audio.play(SoundId::PaddleHit);
    }

    if let Some(winner) = state.score.winner(state.tuning.winning_score) {
        state.set_phase(GamePhase::GameOver { winner });
        state.events.push(GameEvent::MatchWon(winner));
        audio.stop_music();
        audio.play(SoundId::GameOver);
        log::info!(
            "{} wins {} - {}",
            winner,
            state.score.player1,
            state.score.player2
        );
    }
}
