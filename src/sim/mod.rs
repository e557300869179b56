//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Integer positions and velocities
//! - No rendering or platform dependencies

pub mod collision;
pub mod geom;
pub mod phase;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use geom::Rect;
pub use phase::{GamePhase, MenuEvent, MenuOption, Transition};
pub use snapshot::GameSnapshot;
pub use state::{Ball, Direction, GameEvent, GameState, Paddle, PlayerId, Score, Side};
pub use tick::{TickInput, TickOutcome, tick};
