//! Match simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Time comes in as `dt`, never read from a clock
//! - Every numeric edge case is absorbed, nothing here returns an error
//! - Stable step order (walls, player, opponent, goals, AI)

pub mod ai;
pub mod collision;
pub mod physics;
pub mod state;
pub mod tick;

pub use ai::{pursue, pursuit_target};
pub use collision::{Contact, paddle_contact, reflect_velocity};
pub use physics::step_ball;
pub use state::{
    Actor, Axis, Ball, Difficulty, Field, GoalZone, MatchEvent, MatchState, Score, Side,
};
pub use tick::{TickInput, tick};
