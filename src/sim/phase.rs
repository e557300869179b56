//! Game phase state machine
//!
//! Exactly one phase is active at a time. Phases change only through
//! [`GamePhase::on_event`], the countdown cadence, and the win check in the
//! tick; any event not listed for the current phase is ignored.

use std::mem::discriminant;

use serde::{Deserialize, Serialize};

use super::state::PlayerId;

/// Main menu entries, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuOption {
    Play,
    Controls,
    Exit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 3] = [MenuOption::Play, MenuOption::Controls, MenuOption::Exit];

    pub fn index(self) -> usize {
        match self {
            MenuOption::Play => 0,
            MenuOption::Controls => 1,
            MenuOption::Exit => 2,
        }
    }

    /// Option at `index`, wrapping past the end
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Entry above this one (wraps to the bottom)
    pub fn previous(self) -> Self {
        let len = Self::ALL.len();
        Self::from_index((self.index() + len - 1) % len)
    }

    /// Entry below this one (wraps to the top)
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::Play => "PLAY GAME",
            MenuOption::Controls => "CONTROLS",
            MenuOption::Exit => "EXIT",
        }
    }
}

/// Discrete (edge-triggered) commands from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuEvent {
    NavigateUp,
    NavigateDown,
    Confirm,
    Escape,
    Space,
}

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu with the highlighted entry
    Menu { selection: MenuOption },
    /// "Starting in N" overlay; gameplay suspended
    Countdown { remaining: u32, started_at_ms: u64 },
    /// Active gameplay
    Playing,
    /// Gameplay frozen until Space
    Paused,
    /// Match ended; Space starts a fresh one
    GameOver { winner: PlayerId },
}

impl Default for GamePhase {
    fn default() -> Self {
        GamePhase::Menu {
            selection: MenuOption::Play,
        }
    }
}

/// Outcome of feeding a [`MenuEvent`] to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Event has no meaning in the current phase
    Ignored,
    /// Menu highlight moved
    Selected(MenuOption),
    /// Confirm on Controls: display only, phase unchanged
    ShowControls,
    StartCountdown,
    /// Confirm on Exit: the host should terminate
    Exit,
    Paused,
    Resumed,
    /// GameOver -> Playing; the caller must reset the match
    Restarted,
}

impl GamePhase {
    /// Apply a discrete input event
    pub fn on_event(&mut self, event: MenuEvent, now_ms: u64, countdown_from: u32) -> Transition {
        match (*self, event) {
            (GamePhase::Menu { selection }, MenuEvent::NavigateUp) => {
                let selection = selection.previous();
                *self = GamePhase::Menu { selection };
                Transition::Selected(selection)
            }
            (GamePhase::Menu { selection }, MenuEvent::NavigateDown) => {
                let selection = selection.next();
                *self = GamePhase::Menu { selection };
                Transition::Selected(selection)
            }
            (GamePhase::Menu { selection }, MenuEvent::Confirm) => match selection {
                MenuOption::Play => {
                    *self = GamePhase::Countdown {
                        remaining: countdown_from,
                        started_at_ms: now_ms,
                    };
                    Transition::StartCountdown
                }
                MenuOption::Controls => Transition::ShowControls,
                MenuOption::Exit => Transition::Exit,
            },
            (GamePhase::Playing, MenuEvent::Escape) => {
                *self = GamePhase::Paused;
                Transition::Paused
            }
            (GamePhase::Paused, MenuEvent::Space) => {
                *self = GamePhase::Playing;
                Transition::Resumed
            }
            (GamePhase::GameOver { .. }, MenuEvent::Space) => {
                *self = GamePhase::Playing;
                Transition::Restarted
            }
            _ => Transition::Ignored,
        }
    }

    /// Step the countdown once `step_ms` has elapsed since the last step.
    ///
    /// Returns `true` on the tick the countdown runs out and play begins.
    pub fn advance_countdown(&mut self, now_ms: u64, step_ms: u64) -> bool {
        let GamePhase::Countdown {
            remaining,
            started_at_ms,
        } = self
        else {
            return false;
        };

        if now_ms.saturating_sub(*started_at_ms) < step_ms {
            return false;
        }
        *remaining = remaining.saturating_sub(1);
        *started_at_ms = now_ms;
        if *remaining < 1 {
            *self = GamePhase::Playing;
            return true;
        }
        false
    }

    /// Whether paddles and ball move this tick
    #[inline]
    pub fn is_simulating(&self) -> bool {
        matches!(self, GamePhase::Playing)
    }

    /// True when `other` is a different phase, ignoring per-phase data
    /// (menu highlight, countdown progress)
    pub fn differs_from(&self, other: &GamePhase) -> bool {
        discriminant(self) != discriminant(other)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GamePhase::Menu { .. } => "Menu",
            GamePhase::Countdown { .. } => "Countdown",
            GamePhase::Playing => "Playing",
            GamePhase::Paused => "Paused",
            GamePhase::GameOver { .. } => "GameOver",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_up_three_times_wraps_to_start() {
        let mut phase = GamePhase::default();
        for _ in 0..3 {
            phase.on_event(MenuEvent::NavigateUp, 0, 3);
        }
        assert_eq!(
            phase,
            GamePhase::Menu {
                selection: MenuOption::Play
            }
        );
    }

    #[test]
    fn test_menu_navigation_wraps_both_ways() {
        let mut phase = GamePhase::default();
        assert_eq!(
            phase.on_event(MenuEvent::NavigateUp, 0, 3),
            Transition::Selected(MenuOption::Exit)
        );
        assert_eq!(
            phase.on_event(MenuEvent::NavigateDown, 0, 3),
            Transition::Selected(MenuOption::Play)
        );
        assert_eq!(
            phase.on_event(MenuEvent::NavigateDown, 0, 3),
            Transition::Selected(MenuOption::Controls)
        );
    }

    #[test]
    fn test_confirm_play_starts_countdown() {
        let mut phase = GamePhase::default();
        assert_eq!(
            phase.on_event(MenuEvent::Confirm, 250, 3),
            Transition::StartCountdown
        );
        assert_eq!(
            phase,
            GamePhase::Countdown {
                remaining: 3,
                started_at_ms: 250
            }
        );
    }

    #[test]
    fn test_confirm_controls_is_display_only() {
        let mut phase = GamePhase::Menu {
            selection: MenuOption::Controls,
        };
        assert_eq!(
            phase.on_event(MenuEvent::Confirm, 0, 3),
            Transition::ShowControls
        );
        assert_eq!(
            phase,
            GamePhase::Menu {
                selection: MenuOption::Controls
            }
        );
    }

    #[test]
    fn test_confirm_exit_requests_exit() {
        let mut phase = GamePhase::Menu {
            selection: MenuOption::Exit,
        };
        assert_eq!(phase.on_event(MenuEvent::Confirm, 0, 3), Transition::Exit);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut phase = GamePhase::Playing;
        assert_eq!(phase.on_event(MenuEvent::Space, 0, 3), Transition::Ignored);
        assert_eq!(phase.on_event(MenuEvent::Escape, 0, 3), Transition::Paused);
        assert_eq!(phase, GamePhase::Paused);
        assert_eq!(phase.on_event(MenuEvent::Escape, 0, 3), Transition::Ignored);
        assert_eq!(phase.on_event(MenuEvent::Space, 0, 3), Transition::Resumed);
        assert_eq!(phase, GamePhase::Playing);
    }

    #[test]
    fn test_game_over_space_restarts() {
        let mut phase = GamePhase::GameOver {
            winner: PlayerId::Player1,
        };
        assert_eq!(phase.on_event(MenuEvent::Escape, 0, 3), Transition::Ignored);
        assert_eq!(phase.on_event(MenuEvent::Space, 0, 3), Transition::Restarted);
        assert_eq!(phase, GamePhase::Playing);
    }

    #[test]
    fn test_countdown_ignores_events() {
        let mut phase = GamePhase::Countdown {
            remaining: 3,
            started_at_ms: 0,
        };
        for event in [
            MenuEvent::NavigateUp,
            MenuEvent::Confirm,
            MenuEvent::Escape,
            MenuEvent::Space,
        ] {
            assert_eq!(phase.on_event(event, 10, 3), Transition::Ignored);
        }
    }

    #[test]
    fn test_countdown_steps_once_per_second() {
        let mut phase = GamePhase::Countdown {
            remaining: 3,
            started_at_ms: 0,
        };
        assert!(!phase.advance_countdown(999, 1000));
        assert!(!phase.advance_countdown(1000, 1000));
        assert_eq!(
            phase,
            GamePhase::Countdown {
                remaining: 2,
                started_at_ms: 1000
            }
        );
        assert!(!phase.advance_countdown(2000, 1000));
        assert!(phase.advance_countdown(3000, 1000));
        assert_eq!(phase, GamePhase::Playing);
    }

    #[test]
    fn test_advance_countdown_outside_countdown_is_noop() {
        let mut phase = GamePhase::Paused;
        assert!(!phase.advance_countdown(10_000, 1000));
        assert_eq!(phase, GamePhase::Paused);
    }

    #[test]
    fn test_menu_labels_in_display_order() {
        let labels: Vec<&str> = MenuOption::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["PLAY GAME", "CONTROLS", "EXIT"]);
    }

    #[test]
    fn test_differs_from_ignores_payload() {
        let a = GamePhase::Menu {
            selection: MenuOption::Play,
        };
        let b = GamePhase::Menu {
            selection: MenuOption::Exit,
        };
        assert!(!a.differs_from(&b));
        assert!(a.differs_from(&GamePhase::Playing));
    }
}
