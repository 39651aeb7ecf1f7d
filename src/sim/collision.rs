//! Collision detection and response between the ball and the paddles
//!
//! Detection is a box overlap on half extents; the response treats the
//! contact as if both bodies were round and reflects about the centre line.

use glam::Vec2;

use super::state::{Actor, Ball};
use crate::consts::{BALL_WIDTH, PLAYER_WIDTH};
use crate::unit_or;

/// Contact between a paddle and the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from paddle centre to ball centre
    pub normal: Vec2,
    /// Distance to move the ball along `normal` to separate
    pub penetration: f32,
}

/// Half of the summed paddle and ball widths, used as the contact radius
pub const CONTACT_REACH: f32 = (PLAYER_WIDTH + BALL_WIDTH) / 2.0;

/// Check whether the paddle touches the ball
#[inline]
pub fn touching(actor: &Actor, ball: &Ball) -> bool {
    actor.rect().overlaps(&ball.rect())
}

/// Contact normal and push-out depth for a paddle/ball overlap
///
/// Coincident centres fall back to a normal of `(1, 0)`.
pub fn paddle_contact(actor: &Actor, ball: &Ball) -> Option<Contact> {
    if !touching(actor, ball) {
        return None;
    }
    let offset = ball.center() - actor.center();
    Some(Contact {
        normal: unit_or(offset, Vec2::X),
        penetration: CONTACT_REACH - offset.length(),
    })
}

/// Opponent response vector: centre offset scaled by the contact reach
///
/// Not normalised, so its length varies with where the ball touches.
#[inline]
pub fn opponent_normal(opponent: &Actor, ball: &Ball) -> Vec2 {
    (ball.center() - opponent.center()) / CONTACT_REACH
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
