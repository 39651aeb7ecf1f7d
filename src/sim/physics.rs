//! Ball physics step
//!
//! Order matters and is fixed: integrate, friction, walls, player contact,
//! opponent contact, goal check. Wall resolution may move the ball before
//! the paddles are tested.

use glam::Vec2;

use super::collision::{opponent_normal, paddle_contact, reflect_velocity, touching};
use super::state::{Actor, Axis, Ball, Field, MatchEvent, MatchState};
use crate::consts::PLAYER_SPEED_INCREASE;
use crate::tuning::PhysicsTuning;

/// Extra clearance when sliding a pinned ball off an actor
const ESCAPE_SLOP: f32 = 0.01;

/// Advance the ball by `dt` seconds and resolve everything it touches
///
/// Returns the events raised this step. A non-positive or non-finite `dt`
/// leaves the ball untouched.
pub fn step_ball(state: &mut MatchState, tuning: &PhysicsTuning, dt: f32) -> Vec<MatchEvent> {
    let mut events = Vec::new();
    if !(dt.is_finite() && dt > 0.0) {
        return events;
    }

    integrate(state, tuning, dt);
    bounce_off_walls(state, &mut events);
    player_contact(state, tuning, &mut events);
    opponent_contact(state, tuning, &mut events);
    check_goal(state, &mut events);

    if !state.ball.vel.is_finite() {
        log::warn!("Ball velocity diverged ({:?}), stopping ball", state.ball.vel);
        state.ball.vel = Vec2::ZERO;
    }

    events
}

/// Move by velocity, then apply per-tick friction
fn integrate(state: &mut MatchState, tuning: &PhysicsTuning, dt: f32) {
    let ball = &mut state.ball;
    ball.pos += ball.vel * dt;
    ball.vel *= tuning.friction;
}

/// Each axis reflects and clamps independently; both can fire in a corner
fn bounce_off_walls(state: &mut MatchState, events: &mut Vec<MatchEvent>) {
    let max = state.field.max_pos(state.ball.size);
    let ball = &mut state.ball;

    if ball.pos.x < 0.0 || ball.pos.x > max.x {
        ball.vel.x = -ball.vel.x;
        ball.pos.x = ball.pos.x.clamp(0.0, max.x);
        events.push(MatchEvent::WallBounce { axis: Axis::X });
    }
    if ball.pos.y < 0.0 || ball.pos.y > max.y {
        ball.vel.y = -ball.vel.y;
        ball.pos.y = ball.pos.y.clamp(0.0, max.y);
        events.push(MatchEvent::WallBounce { axis: Axis::Y });
    }
}

fn player_contact(state: &mut MatchState, tuning: &PhysicsTuning, events: &mut Vec<MatchEvent>) {
    let Some(contact) = paddle_contact(&state.player, &state.ball) else {
        return;
    };
    let ball = &mut state.ball;

    // Push out so the ball doesn't stick, but never through a side line
    let pushed = ball.pos + contact.normal * contact.penetration;
    ball.pos = state.field.clamp(pushed, ball.size);
    if ball.pos != pushed && touching(&state.player, ball) {
        // Pinned against a line: slide out along whichever axis is free
        if let Some(pos) = escape_position(&state.player, ball, &state.field) {
            ball.pos = pos;
        }
    }

    ball.vel = reflect_velocity(ball.vel, contact.normal);

    let kick = tuning.is_near_stationary(ball.vel);
    if kick {
        ball.vel = contact.normal * tuning.initial_hit_speed_multiplier;
    } else {
        ball.vel *= PLAYER_SPEED_INCREASE;
    }

    log::debug!("Player hit (kick: {}), ball vel {:?}", kick, ball.vel);
    events.push(MatchEvent::PlayerHit { kick });
}

/// Nearest in-field position that clears the actor on a single axis
fn escape_position(actor: &Actor, ball: &Ball, field: &Field) -> Option<Vec2> {
    let reach = (actor.size + ball.size) / 2.0 + Vec2::splat(ESCAPE_SLOP);
    let max = field.max_pos(ball.size);
    let anchor = actor.center() - ball.size / 2.0;

    let mut candidates = Vec::with_capacity(4);
    for side in [-1.0, 1.0] {
        candidates.push(Vec2::new(anchor.x + side * reach.x, ball.pos.y));
        candidates.push(Vec2::new(ball.pos.x, anchor.y + side * reach.y));
    }
    candidates
        .into_iter()
        .filter(|pos| pos.cmpge(Vec2::ZERO).all() && pos.cmple(max).all())
        .min_by(|a, b| {
            a.distance_squared(ball.pos)
                .total_cmp(&b.distance_squared(ball.pos))
        })
}

/// The opponent uses the raw centre offset rather than a unit normal
fn opponent_contact(state: &mut MatchState, tuning: &PhysicsTuning, events: &mut Vec<MatchEvent>) {
    if !touching(&state.opponent, &state.ball) {
        return;
    }
    let ball = &mut state.ball;

    let kick = tuning.is_near_stationary(ball.vel);
    if kick {
        let offset = ball.center() - state.opponent.center();
        ball.vel = offset * tuning.initial_hit_speed_multiplier;
    } else {
        let normal = opponent_normal(&state.opponent, ball);
        ball.vel = reflect_velocity(ball.vel, normal) * tuning.moving_hit_speed_multiplier;
    }

    log::debug!("Opponent hit (kick: {}), ball vel {:?}", kick, ball.vel);
    events.push(MatchEvent::OpponentHit { kick });
}

fn check_goal(state: &mut MatchState, events: &mut Vec<MatchEvent>) {
    let Some(scorer) = state.field.goal_at(state.ball.pos).map(|goal| goal.scorer) else {
        return;
    };

    state.score.record(scorer);
    state.ball.reset(&state.field);

    log::info!(
        "Goal for {:?}! {} / {}",
        scorer,
        state.score.player_label(),
        state.score.opponent_label()
    );
    events.push(MatchEvent::Goal { scorer });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Difficulty, Side};

    const DT: f32 = 1.0 / 60.0;

    /// Match with both paddles parked in corners away from the ball
    fn open_field() -> MatchState {
        let mut state = MatchState::new(Difficulty::Rookie);
        state.player.pos = Vec2::new(0.0, 0.0);
        state.opponent.pos = Vec2::new(720.0, 540.0);
        state
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let mut state = open_field();
        state.ball.vel = Vec2::new(50.0, -20.0);
        let before = state.clone();

        let events = step_ball(&mut state, &PhysicsTuning::default(), 0.0);
        assert!(events.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_integrate_then_friction() {
        let mut state = open_field();
        state.ball.vel = Vec2::new(60.0, 30.0);
        let tuning = PhysicsTuning::default();

        step_ball(&mut state, &tuning, 0.5);
        assert_eq!(state.ball.pos, Vec2::new(330.0, 215.0));
        assert_eq!(state.ball.vel, Vec2::new(60.0, 30.0) * tuning.friction);
    }

    #[test]
    fn test_wall_reflection_flips_only_that_axis() {
        let mut state = open_field();
        state.ball.pos = Vec2::new(770.0, 150.0);
        state.ball.vel = Vec2::new(600.0, 40.0);
        let tuning = PhysicsTuning::default();

        let events = step_ball(&mut state, &tuning, DT);
        assert_eq!(state.ball.pos.x, SCENE_WIDTH - BALL_WIDTH);
        assert!(state.ball.vel.x < 0.0);
        assert_eq!(state.ball.vel.y, 40.0 * tuning.friction);
        assert_eq!(events, vec![MatchEvent::WallBounce { axis: Axis::X }]);
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let mut state = open_field();
        state.player.pos = Vec2::new(300.0, 300.0);
        state.opponent.pos = Vec2::new(400.0, 400.0);
        state.ball.pos = Vec2::new(2.0, 3.0);
        state.ball.vel = Vec2::new(-300.0, -300.0);

        let events = step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert_eq!(state.ball.pos, Vec2::ZERO);
        assert!(state.ball.vel.x > 0.0 && state.ball.vel.y > 0.0);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_player_kicks_stationary_ball() {
        let mut state = open_field();
        state.player.pos = Vec2::new(100.0, 100.0);
        // Ball centre 30 units right of the player centre
        state.ball.pos = Vec2::new(158.0, 121.0);

        let events = step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert_eq!(state.ball.vel, Vec2::new(60.0, 0.0));
        // Pushed out to the contact reach
        assert!((state.ball.center().x - (140.0 + 52.0)).abs() < 1e-3);
        assert_eq!(events, vec![MatchEvent::PlayerHit { kick: true }]);
    }

    #[test]
    fn test_player_coincident_centres_kick_along_x() {
        let mut state = open_field();
        state.player.pos = Vec2::new(100.0, 100.0);
        state.ball.pos = Vec2::new(128.0, 121.0);

        step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert_eq!(state.ball.vel, Vec2::new(60.0, 0.0));
    }

    #[test]
    fn test_player_doubles_moving_ball() {
        let mut state = open_field();
        state.player.pos = Vec2::new(100.0, 100.0);
        state.ball.pos = Vec2::new(158.0, 121.0);
        state.ball.vel = Vec2::new(-30.0, 0.0);
        let tuning = PhysicsTuning::default();

        step_ball(&mut state, &tuning, 0.0001);
        // Reflected off +x then doubled
        let expected = 30.0 * tuning.friction * PLAYER_SPEED_INCREASE;
        assert!((state.ball.vel.x - expected).abs() < 1e-2);
        assert!(state.ball.vel.y.abs() < 1e-6);
    }

    #[test]
    fn test_opponent_kick_uses_raw_offset() {
        let mut state = open_field();
        state.player.pos = Vec2::new(0.0, 0.0);
        state.opponent.pos = Vec2::new(600.0, 300.0);
        // Ball centre (26, 0) from opponent centre (640, 330)
        state.ball.pos = Vec2::new(654.0, 321.0);

        let events = step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert_eq!(state.ball.vel, Vec2::new(26.0 * 60.0, 0.0));
        assert_eq!(events, vec![MatchEvent::OpponentHit { kick: true }]);
    }

    #[test]
    fn test_opponent_reflects_moving_ball_with_scaled_normal() {
        let mut state = open_field();
        state.opponent.pos = Vec2::new(600.0, 300.0);
        state.ball.pos = Vec2::new(654.0, 321.0);
        state.ball.vel = Vec2::new(-10.0, 0.0);
        let tuning = PhysicsTuning::default();

        step_ball(&mut state, &tuning, 0.0001);
        // n ~ (0.5, 0): v - 2(v·n)n halves v.x, then the multiplier doubles it
        let expected = -10.0 * tuning.friction * 0.5 * tuning.moving_hit_speed_multiplier;
        assert!((state.ball.vel.x - expected).abs() < 1e-2);
    }

    #[test]
    fn test_right_goal_scores_for_player() {
        let mut state = open_field();
        state.ball.pos = Vec2::new(760.0, 300.0);

        let events = step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert_eq!(state.score.player, 1);
        assert_eq!(state.score.opponent, 0);
        assert_eq!(state.ball.pos, Vec2::new(388.0, 291.0));
        assert_eq!(state.ball.vel, Vec2::ZERO);
        assert_eq!(events, vec![MatchEvent::Goal { scorer: Side::Player }]);
    }

    #[test]
    fn test_left_goal_scores_for_opponent() {
        let mut state = open_field();
        state.player.pos = Vec2::new(300.0, 0.0);
        state.ball.pos = Vec2::new(20.0, 260.0);

        let events = step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert_eq!(state.score.opponent, 1);
        assert_eq!(state.score.player, 0);
        assert_eq!(state.ball.pos, Vec2::new(388.0, 291.0));
        assert_eq!(events, vec![MatchEvent::Goal { scorer: Side::Opponent }]);
    }

    #[test]
    fn test_ball_beside_goal_mouth_does_not_score() {
        let mut state = open_field();
        state.player.pos = Vec2::new(300.0, 0.0);
        state.ball.pos = Vec2::new(20.0, 200.0);

        step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert_eq!(state.score, Default::default());
    }

    #[test]
    fn test_push_out_never_leaves_field() {
        let mut state = open_field();
        state.player.pos = Vec2::new(700.0, 100.0);
        // Ball pinned against the right line, overlapping the paddle
        state.ball.pos = Vec2::new(776.0, 121.0);

        step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert!(state.ball.pos.x <= SCENE_WIDTH - BALL_WIDTH);
        assert!(state.ball.pos.x >= 0.0);
    }

    #[test]
    fn test_pinned_ball_slides_off_instead_of_repeat_hits() {
        let mut state = open_field();
        state.player.pos = Vec2::new(720.0, 130.0);
        state.ball.pos = Vec2::new(776.0, 121.0);
        let tuning = PhysicsTuning::default();

        let mut hits = 0;
        for _ in 0..120 {
            let events = step_ball(&mut state, &tuning, DT);
            hits += events
                .iter()
                .filter(|e| matches!(e, MatchEvent::PlayerHit { .. }))
                .count();
            assert!(state.ball.vel.length() <= tuning.initial_hit_speed_multiplier + 1e-3);
        }
        assert_eq!(hits, 1);
        assert!(!touching(&state.player, &state.ball));
    }

    #[test]
    fn test_diverged_velocity_is_zeroed() {
        let mut state = open_field();
        state.ball.vel = Vec2::new(f32::INFINITY, 0.0);

        step_ball(&mut state, &PhysicsTuning::default(), DT);
        assert_eq!(state.ball.vel, Vec2::ZERO);
    }
}
