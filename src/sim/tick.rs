//! Variable timestep simulation tick
//!
//! One tick: pointer input moves the player, the ball is stepped, then the
//! opponent chases the ball.

use glam::Vec2;

use super::ai::pursue;
use super::physics::step_ball;
use super::state::{MatchEvent, MatchState};
use crate::tuning::PhysicsTuning;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position in field coordinates, if it moved
    pub pointer: Option<Vec2>,
}

/// Advance the match by `dt` seconds
pub fn tick(
    state: &mut MatchState,
    input: &TickInput,
    tuning: &PhysicsTuning,
    dt: f32,
) -> Vec<MatchEvent> {
    if let Some(pointer) = input.pointer {
        state.player.center_on(pointer, &state.field);
    }

    let events = step_ball(state, tuning, dt);

    let speed = state.opponent_speed();
    pursue(&mut state.opponent, &state.ball, &state.field, speed, dt);

    events
}
