//! Kickabout - A single-screen arcade soccer game
//!
//! Core modules:
//! - `sim`: Match simulation (ball physics, opponent AI, scoring)
//! - `session`: Menu/running/paused state machine and game clock
//! - `tuning`: Data-driven physics constants
//! - `renderer`: WebGPU rendering pipeline

pub mod renderer;
pub mod session;
pub mod sim;
pub mod tuning;

pub use session::{Phase, Session, Snapshot};
pub use tuning::{PhysicsTuning, TuningError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Field dimensions
    pub const SCENE_WIDTH: f32 = 800.0;
    pub const SCENE_HEIGHT: f32 = 600.0;

    /// Player and opponent share one paddle size (10% of the field)
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;

    /// Ball size (3% of the field)
    pub const BALL_WIDTH: f32 = 24.0;
    pub const BALL_HEIGHT: f32 = 18.0;

    /// Goal mouths, one on each side line
    pub const GOAL_WIDTH: f32 = 50.0;
    pub const GOAL_HEIGHT: f32 = 100.0;
    pub const GOAL_Y: f32 = 250.0;
    pub const RIGHT_GOAL_X: f32 = SCENE_WIDTH - GOAL_WIDTH;

    /// Kickoff positions (top-left corners)
    pub const PLAYER_START: Vec2 = Vec2::new(100.0, 100.0);
    pub const OPPONENT_START: Vec2 = Vec2::new(600.0, 300.0);
    pub const BALL_START: Vec2 = Vec2::new(300.0, 200.0);

    /// Flat multiplier when the player strikes a moving ball
    pub const PLAYER_SPEED_INCREASE: f32 = 2.0;

    /// Longest frame the clock will hand to the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Axis-aligned box: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        center_of(self.pos, self.size)
    }

    /// Half-open containment test on the top-left corner of `point`
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.pos.x
            && point.x < self.pos.x + self.size.x
            && point.y >= self.pos.y
            && point.y < self.pos.y + self.size.y
    }

    /// Half-extent overlap: centres closer than the summed half sizes on both axes
    pub fn overlaps(&self, other: &Rect) -> bool {
        let gap = (self.center() - other.center()).abs();
        let reach = (self.size + other.size) / 2.0;
        gap.x < reach.x && gap.y < reach.y
    }
}

/// Centre of a box given its top-left corner and size
#[inline]
pub fn center_of(pos: Vec2, size: Vec2) -> Vec2 {
    pos + size / 2.0
}

/// Clamp a box's top-left corner so the whole box stays inside `bounds`
#[inline]
pub fn clamp_box(pos: Vec2, size: Vec2, bounds: Vec2) -> Vec2 {
    pos.clamp(Vec2::ZERO, (bounds - size).max(Vec2::ZERO))
}

/// Unit vector along `v`, or `fallback` when `v` has zero length
#[inline]
pub fn unit_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let length = v.length();
    if length != 0.0 { v / length } else { fallback }
}
