//! Opponent pursuit
//!
//! The opponent chases the ball at a constant speed with a sign step per
//! axis. It is not proportional, so it overshoots and jitters once it
//! reaches the ball; that is the intended feel of the easier presets.

use glam::Vec2;

use super::state::{Actor, Ball, Field};

/// Top-left corner that would centre the actor on the ball
#[inline]
pub fn pursuit_target(actor: &Actor, ball: &Ball) -> Vec2 {
    ball.center() - actor.size / 2.0
}

/// Step one axis toward the target; ties step backwards
#[inline]
fn sign_step(pos: f32, target: f32, step: f32) -> f32 {
    if pos < target { pos + step } else { pos - step }
}

/// Move the opponent toward the ball by `speed * dt` per axis, kept on the pitch
pub fn pursue(opponent: &mut Actor, ball: &Ball, field: &Field, speed: f32, dt: f32) {
    if !(dt.is_finite() && dt > 0.0) {
        return;
    }
    let step = speed * dt;
    let target = pursuit_target(opponent, ball);

    let next = Vec2::new(
        sign_step(opponent.pos.x, target.x, step),
        sign_step(opponent.pos.y, target.y, step),
    );
    opponent.pos = field.clamp(next, opponent.size);
}
