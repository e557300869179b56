//! Per-tick collision detection and response
//!
//! Runs once per tick after movement, always in this order:
//! 1. Ball vs top/bottom walls
//! 2. Ball vs left paddle
//! 3. Ball vs right paddle
//! 4. Paddles clamped to the arena
//! 5. Ball past the left edge (Player 2 scores)
//! 6. Ball past the right edge (Player 1 scores)
//!
//! Goals are checked last so a ball that leaves the arena while overlapping a
//! clamped paddle still scores. Detection is a plain AABB overlap test; a fast
//! enough ball can tunnel through a paddle.

use super::state::{GameEvent, GameState, PlayerId, Side};

/// Run the full collision pass, pushing what happened onto `state.events`
pub fn resolve(state: &mut GameState) {
    bounce_off_walls(state);
    deflect_off_paddle(state, Side::Left);
    deflect_off_paddle(state, Side::Right);
    clamp_paddles(state);
    check_goals(state);
}

/// Invert vertical velocity when the ball reaches the top or bottom wall.
///
/// Only a ball still heading into the wall is bounced, so a ball that dug in
/// deeper than one tick of travel cannot flip back and forth in place.
pub fn bounce_off_walls(state: &mut GameState) -> bool {
    let floor = state.tuning.arena_height - state.tuning.ball_diameter;
    let ball = &mut state.ball;

    let hit_top = ball.rect.y() <= 0 && ball.vel.y < 0;
    let hit_bottom = ball.rect.y() >= floor && ball.vel.y > 0;
    if !(hit_top || hit_bottom) {
        return false;
    }

    ball.bounce_vertical();
    state.events.push(GameEvent::WallBounce);
    true
}

/// Return the ball if it overlaps the paddle on `side`
pub fn deflect_off_paddle(state: &mut GameState, side: Side) -> bool {
    let paddle = match side {
        Side::Left => &state.left,
        Side::Right => &state.right,
    };
    if !state.ball.rect.intersects(&paddle.rect) {
        return false;
    }

    state.ball.deflect_off(paddle, state.tuning.max_ball_velocity);
    state.events.push(GameEvent::PaddleHit(side));
    true
}

/// Keep both paddles inside `[0, arena_height - paddle_height]`
pub fn clamp_paddles(state: &mut GameState) {
    let max_y = state.tuning.max_paddle_y();
    state.left.rect.clamp_y(0, max_y);
    state.right.rect.clamp_y(0, max_y);

    debug_assert!((0..=max_y).contains(&state.left.rect.y()));
    debug_assert!((0..=max_y).contains(&state.right.rect.y()));
}

/// Award a point if the ball has left the arena, then respawn paddles and ball
pub fn check_goals(state: &mut GameState) -> Option<PlayerId> {
    let far_edge = state.tuning.arena_width - state.tuning.ball_diameter;
    let x = state.ball.rect.x();

    let scorer = if x <= 0 {
        PlayerId::Player2
    } else if x >= far_edge {
        PlayerId::Player1
    } else {
        return None;
    };

    state.score.increment(scorer);
    state.respawn_entities();
    state.events.push(GameEvent::PointScored(scorer));
    log::debug!(
        "{} scores ({} - {})",
        scorer,
        state.score.player1,
        state.score.player2
    );
    Some(scorer)
}
