//! Match state and core simulation types
//!
//! Everything the renderer draws and the physics step mutates lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{Rect, clamp_box};

/// Opponent skill preset, picked once from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    #[default]
    Rookie,
    Professional,
    Legendary,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Rookie,
        Difficulty::Professional,
        Difficulty::Legendary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Rookie => "Rookie",
            Difficulty::Professional => "Professional",
            Difficulty::Legendary => "Legendary",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rookie" => Some(Difficulty::Rookie),
            "professional" | "pro" => Some(Difficulty::Professional),
            "legendary" => Some(Difficulty::Legendary),
            _ => None,
        }
    }

    /// Menu button label
    pub fn label(&self) -> String {
        format!("{} Mode", self.as_str())
    }

    /// Opponent pursuit speed (units per second)
    pub fn opponent_speed(&self) -> f32 {
        match self {
            Difficulty::Rookie => 75.0,
            Difficulty::Professional => 150.0,
            Difficulty::Legendary => 230.0,
        }
    }
}

/// Which side scored / which paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Things that happened during a tick (for logging and presentation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// Ball bounced off a side line
    WallBounce { axis: Axis },
    /// Player struck the ball; `kick` is true for a near-stationary ball
    PlayerHit { kick: bool },
    /// Opponent struck the ball
    OpponentHit { kick: bool },
    /// Ball entered a goal mouth
    Goal { scorer: Side },
}

/// A goal mouth on one side line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalZone {
    pub rect: Rect,
    /// Side credited when the ball enters this zone
    pub scorer: Side,
}

/// Fixed pitch geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub size: Vec2,
    /// Defended by the player, scores for the opponent
    pub left_goal: GoalZone,
    /// Defended by the opponent, scores for the player
    pub right_goal: GoalZone,
}

impl Default for Field {
    fn default() -> Self {
        let goal_size = Vec2::new(GOAL_WIDTH, GOAL_HEIGHT);
        Self {
            size: Vec2::new(SCENE_WIDTH, SCENE_HEIGHT),
            left_goal: GoalZone {
                rect: Rect::new(Vec2::new(0.0, GOAL_Y), goal_size),
                scorer: Side::Opponent,
            },
            right_goal: GoalZone {
                rect: Rect::new(Vec2::new(RIGHT_GOAL_X, GOAL_Y), goal_size),
                scorer: Side::Player,
            },
        }
    }
}

impl Field {
    pub fn rect(&self) -> Rect {
        Rect::new(Vec2::ZERO, self.size)
    }

    /// Largest top-left corner a box of `size` may occupy
    #[inline]
    pub fn max_pos(&self, size: Vec2) -> Vec2 {
        (self.size - size).max(Vec2::ZERO)
    }

    /// Clamp a box into the pitch
    #[inline]
    pub fn clamp(&self, pos: Vec2, size: Vec2) -> Vec2 {
        clamp_box(pos, size, self.size)
    }

    /// Top-left corner that puts a box of `size` on the centre spot
    pub fn center_spot(&self, size: Vec2) -> Vec2 {
        self.size / 2.0 - size / 2.0
    }

    /// Goal zone the ball position falls in, right side checked first
    pub fn goal_at(&self, ball_pos: Vec2) -> Option<&GoalZone> {
        [&self.right_goal, &self.left_goal]
            .into_iter()
            .find(|goal| goal.rect.contains(ball_pos))
    }
}

/// A paddle (player or opponent)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Actor {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Put the paddle's centre on `point`, kept inside the field
    pub fn center_on(&mut self, point: Vec2, field: &Field) {
        self.pos = field.clamp(point - self.size / 2.0, self.size);
    }
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: BALL_START,
            vel: Vec2::ZERO,
            size: Vec2::new(BALL_WIDTH, BALL_HEIGHT),
        }
    }
}

impl Ball {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Back to the centre spot, at rest
    pub fn reset(&mut self, field: &Field) {
        self.pos = field.center_spot(self.size);
        self.vel = Vec2::ZERO;
    }
}

/// Goals scored this session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    pub opponent: u32,
}

impl Score {
    pub fn record(&mut self, scorer: Side) {
        match scorer {
            Side::Player => self.player += 1,
            Side::Opponent => self.opponent += 1,
        }
    }

    /// HUD text for the player's tally
    pub fn player_label(&self) -> String {
        format!("Player Score: {}", self.player)
    }

    /// HUD text for the opponent's tally
    pub fn opponent_label(&self) -> String {
        format!("Opponent Score: {}", self.opponent)
    }
}

/// Complete match state for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub field: Field,
    pub ball: Ball,
    pub player: Actor,
    pub opponent: Actor,
    pub score: Score,
    /// Fixed at kickoff
    difficulty: Difficulty,
}

impl MatchState {
    /// Kickoff layout for the chosen difficulty
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            field: Field::default(),
            ball: Ball::default(),
            player: Actor::new(PLAYER_START),
            opponent: Actor::new(OPPONENT_START),
            score: Score::default(),
            difficulty,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn opponent_speed(&self) -> f32 {
        self.difficulty.opponent_speed()
    }
}
