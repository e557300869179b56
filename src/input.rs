//! Keyboard input handling
//!
//! The platform layer feeds raw key edges into [`KeyboardState`]; the game
//! loop reads it once per tick through [`InputPort`]. Paddle directions are
//! level-triggered (whatever is held right now), menu commands are
//! edge-triggered and queued.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::sim::{Direction, MenuEvent, PlayerId, TickInput};

/// Pending menu events kept between ticks; older presses are dropped first
pub const MAX_PENDING_EVENTS: usize = 8;

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    S,
    Up,
    Down,
    Enter,
    Escape,
    Space,
}

impl Key {
    /// Map a DOM/winit style key name
    pub fn from_name(name: &str) -> Option<Key> {
        match name {
            "w" | "W" => Some(Key::W),
            "s" | "S" => Some(Key::S),
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            "Enter" => Some(Key::Enter),
            "Escape" => Some(Key::Escape),
            " " | "Space" => Some(Key::Space),
            _ => None,
        }
    }

    /// Menu command issued when this key goes down
    pub fn menu_event(self) -> Option<MenuEvent> {
        match self {
            Key::Up => Some(MenuEvent::NavigateUp),
            Key::Down => Some(MenuEvent::NavigateDown),
            Key::Enter => Some(MenuEvent::Confirm),
            Key::Escape => Some(MenuEvent::Escape),
            Key::Space => Some(MenuEvent::Space),
            Key::W | Key::S => None,
        }
    }

    /// (up, down) keys for a player's paddle
    pub fn paddle_keys(player: PlayerId) -> (Key, Key) {
        match player {
            PlayerId::Player1 => (Key::W, Key::S),
            PlayerId::Player2 => (Key::Up, Key::Down),
        }
    }
}

/// Source of per-tick input for the game loop
pub trait InputPort {
    /// Direction the player is holding right now
    fn direction(&self, player: PlayerId) -> Direction;
    /// Next queued menu command, oldest first
    fn poll_menu_event(&mut self) -> Option<MenuEvent>;
}

/// Held keys plus a bounded queue of menu commands
#[derive(Debug, Default, Clone)]
pub struct KeyboardState {
    held: HashSet<Key>,
    pending: VecDeque<MenuEvent>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Auto-repeat presses of a key already held are
    /// ignored, so each physical press yields at most one menu command.
    pub fn key_down(&mut self, key: Key) {
        if !self.held.insert(key) {
            return;
        }
        if let Some(event) = key.menu_event() {
            if self.pending.len() == MAX_PENDING_EVENTS {
                self.pending.pop_front();
                log::debug!("Input queue full, dropping oldest event");
            }
            self.pending.push_back(event);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn pending_events(&self) -> usize {
        self.pending.len()
    }
}

impl InputPort for KeyboardState {
    fn direction(&self, player: PlayerId) -> Direction {
        let (up, down) = Key::paddle_keys(player);
        match (self.is_key_down(up), self.is_key_down(down)) {
            (true, false) => Direction::Up,
            (false, true) => Direction::Down,
            // Neither or both
            _ => Direction::Stop,
        }
    }

    fn poll_menu_event(&mut self) -> Option<MenuEvent> {
        self.pending.pop_front()
    }
}

/// Sample an input port for one tick, consuming at most one menu event
pub fn read_tick_input(input: &mut dyn InputPort) -> TickInput {
    TickInput {
        left: input.direction(PlayerId::Player1),
        right: input.direction(PlayerId::Player2),
        event: input.poll_menu_event(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowUp"), Some(Key::Up));
        assert_eq!(Key::from_name("W"), Some(Key::W));
        assert_eq!(Key::from_name(" "), Some(Key::Space));
        assert_eq!(Key::from_name("q"), None);
    }

    #[test]
    fn test_held_keys_drive_direction() {
        let mut kb = KeyboardState::new();
        kb.key_down(Key::W);
        kb.key_down(Key::Down);
        assert_eq!(kb.direction(PlayerId::Player1), Direction::Up);
        assert_eq!(kb.direction(PlayerId::Player2), Direction::Down);

        kb.key_up(Key::W);
        assert_eq!(kb.direction(PlayerId::Player1), Direction::Stop);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut kb = KeyboardState::new();
        kb.key_down(Key::W);
        kb.key_down(Key::S);
        assert_eq!(kb.direction(PlayerId::Player1), Direction::Stop);
    }

    #[test]
    fn test_arrows_also_navigate_menu() {
        let mut kb = KeyboardState::new();
        kb.key_down(Key::Up);
        kb.key_down(Key::Enter);
        assert_eq!(kb.poll_menu_event(), Some(MenuEvent::NavigateUp));
        assert_eq!(kb.poll_menu_event(), Some(MenuEvent::Confirm));
        assert_eq!(kb.poll_menu_event(), None);
    }

    #[test]
    fn test_auto_repeat_is_filtered() {
        let mut kb = KeyboardState::new();
        kb.key_down(Key::Escape);
        kb.key_down(Key::Escape);
        assert_eq!(kb.pending_events(), 1);

        kb.key_up(Key::Escape);
        kb.key_down(Key::Escape);
        assert_eq!(kb.pending_events(), 2);
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut kb = KeyboardState::new();
        for _ in 0..MAX_PENDING_EVENTS + 3 {
            kb.key_down(Key::Space);
            kb.key_up(Key::Space);
        }
        assert_eq!(kb.pending_events(), MAX_PENDING_EVENTS);
    }

    #[test]
    fn test_read_tick_input_takes_one_event() {
        let mut kb = KeyboardState::new();
        kb.key_down(Key::S);
        kb.key_down(Key::Enter);
        kb.key_down(Key::Space);

        let input = read_tick_input(&mut kb);
        assert_eq!(input.left, Direction::Down);
        assert_eq!(input.right, Direction::Stop);
        assert_eq!(input.event, Some(MenuEvent::Confirm));
        assert_eq!(read_tick_input(&mut kb).event, Some(MenuEvent::Space));
        assert_eq!(read_tick_input(&mut kb).event, None);
    }
}
