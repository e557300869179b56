//! Read-only view of the game handed to renderers

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::phase::{GamePhase, MenuOption};
use super::state::{GameState, Score};

/// Owned copy of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    /// Arena width and height
    pub arena: IVec2,
    pub left_paddle: Rect,
    pub right_paddle: Rect,
    /// Hidden while in the menu or counting down
    pub ball: Option<Rect>,
    pub score: Score,
}

impl GameState {
    pub fn snapshot(&self) -> GameSnapshot {
        let ball_visible = !matches!(
            self.phase,
            GamePhase::Menu { .. } | GamePhase::Countdown { .. }
        );
        GameSnapshot {
            tick: self.time_ticks,
            phase: self.phase,
            arena: IVec2::new(self.tuning.arena_width, self.tuning.arena_height),
            left_paddle: self.left.rect,
            right_paddle: self.right.rect,
            ball: ball_visible.then_some(self.ball.rect),
            score: self.score,
        }
    }
}

impl GameSnapshot {
    /// Whether the controls panel is shown (Controls highlighted in the menu)
    pub fn show_controls(&self) -> bool {
        matches!(
            self.phase,
            GamePhase::Menu {
                selection: MenuOption::Controls
            }
        )
    }

    /// Large overlay text for the current phase
    pub fn headline(&self) -> Option<String> {
        match self.phase {
            GamePhase::Menu { .. } | GamePhase::Playing => None,
            GamePhase::Countdown { remaining, .. } => Some(format!("Starting in {}", remaining)),
            GamePhase::Paused => Some("PAUSED".to_string()),
            GamePhase::GameOver { winner } => Some(format!("GAME OVER - {} Wins!", winner)),
        }
    }

    /// Hint line under the headline
    pub fn prompt(&self) -> Option<&'static str> {
        match self.phase {
            GamePhase::Paused => Some("Press SPACE to continue"),
            GamePhase::GameOver { .. } => Some("Press SPACE to play again"),
            _ => None,
        }
    }

    /// Score formatted as on the scoreboard ("02 - 05")
    pub fn scoreboard(&self) -> String {
        format!("{:02} - {:02}", self.score.player1, self.score.player2)
    }
}
