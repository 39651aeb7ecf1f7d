//! Session controller
//!
//! Owns the match, the game clock and the menu/running/paused state machine.
//! Input events mutate the session between frames and take effect on the
//! next tick.
//!
//! Manual pause and focus/visibility pause share one flag: regaining focus
//! resumes the match even if the player paused it by hand.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::consts::MAX_FRAME_DT;
use crate::sim::{Difficulty, MatchEvent, MatchState, Score, TickInput, tick};
use crate::tuning::PhysicsTuning;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a difficulty pick
    Menu,
    /// Match in progress
    Running,
    /// Match frozen (manual toggle, focus loss or hidden window)
    Paused,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub field: Rect,
    pub left_goal: Rect,
    pub right_goal: Rect,
    pub ball: Rect,
    pub player: Rect,
    pub opponent: Rect,
    pub score: Score,
}

impl Snapshot {
    fn capture(phase: Phase, state: &MatchState) -> Self {
        Self {
            phase,
            difficulty: state.difficulty(),
            field: state.field.rect(),
            left_goal: state.field.left_goal.rect,
            right_goal: state.field.right_goal.rect,
            ball: state.ball.rect(),
            player: state.player.rect(),
            opponent: state.opponent.rect(),
            score: state.score,
        }
    }
}

/// One play session: menu, then a match until restart
#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    tuning: PhysicsTuning,
    /// `None` while in the menu
    state: Option<MatchState>,
    /// Input gathered since the last tick
    input: TickInput,
    /// Timestamp of the previous running frame (seconds)
    last_time: Option<f64>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PhysicsTuning::default())
    }
}

impl Session {
    pub fn new(tuning: PhysicsTuning) -> Self {
        Self {
            phase: Phase::Menu,
            tuning,
            state: None,
            input: TickInput::default(),
            last_time: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn tuning(&self) -> &PhysicsTuning {
        &self.tuning
    }

    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    /// Start a match from the menu. Ignored once a match is under way.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.phase != Phase::Menu {
            log::warn!(
                "Difficulty {} ignored, match already in progress",
                difficulty.as_str()
            );
            return false;
        }
        self.state = Some(MatchState::new(difficulty));
        self.input = TickInput::default();
        self.last_time = None;
        self.phase = Phase::Running;
        log::info!(
            "Kickoff on {} (opponent speed {})",
            difficulty.as_str(),
            difficulty.opponent_speed()
        );
        true
    }

    /// Record the pointer; the player follows it on the next tick
    pub fn pointer_moved(&mut self, pos: Vec2) {
        if self.phase != Phase::Menu {
            self.input.pointer = Some(pos);
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.set_paused(true, "toggle"),
            Phase::Paused => self.set_paused(false, "toggle"),
            Phase::Menu => {}
        }
    }

    /// Window focus lost or regained
    pub fn focus_changed(&mut self, focused: bool) {
        log::debug!("Focus changed: {}", focused);
        self.set_paused(!focused, "focus");
    }

    /// Window hidden/minimised or shown again
    pub fn visibility_changed(&mut self, visible: bool) {
        log::debug!("Visibility changed: {}", visible);
        self.set_paused(!visible, "visibility");
    }

    /// Tear the match down and go back to the difficulty menu
    pub fn restart(&mut self) {
        self.state = None;
        self.input = TickInput::default();
        self.last_time = None;
        self.phase = Phase::Menu;
        log::info!("Match restarted, back to difficulty selection");
    }

    fn set_paused(&mut self, paused: bool, reason: &str) {
        let next = match (self.phase, paused) {
            (Phase::Running, true) => Phase::Paused,
            (Phase::Paused, false) => Phase::Running,
            _ => return,
        };
        self.phase = next;
        // Elapsed time while frozen is thrown away
        self.last_time = None;
        log::info!("{:?} ({})", next, reason);
    }

    /// Advance from a host timestamp in seconds
    ///
    /// The first running frame, and the first after a pause, has `dt = 0`.
    /// Long frames are capped at `MAX_FRAME_DT`.
    pub fn frame(&mut self, now: f64) -> Vec<MatchEvent> {
        if self.phase != Phase::Running {
            self.last_time = None;
            return Vec::new();
        }
        let dt = match self.last_time {
            Some(prev) => ((now - prev) as f32).clamp(0.0, MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time = Some(now);
        self.advance(dt)
    }

    /// Run one tick with a caller-measured `dt`; does nothing unless running
    pub fn advance(&mut self, dt: f32) -> Vec<MatchEvent> {
        if self.phase != Phase::Running {
            return Vec::new();
        }
        let Some(state) = self.state.as_mut() else {
            return Vec::new();
        };
        let input = std::mem::take(&mut self.input);
        tick(state, &input, &self.tuning, dt)
    }

    /// Current drawable state, `None` in the menu
    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state
            .as_ref()
            .map(|state| Snapshot::capture(self.phase, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    fn running(difficulty: Difficulty) -> Session {
        let mut session = Session::default();
        assert!(session.select_difficulty(difficulty));
        session
    }

    #[test]
    fn test_starts_in_menu() {
        let mut session = Session::default();
        assert_eq!(session.phase(), Phase::Menu);
        assert!(session.snapshot().is_none());
        assert!(session.frame(1.0).is_empty());
        assert!(session.advance(0.1).is_empty());
    }

    #[test]
    fn test_selection_builds_kickoff_state() {
        let session = running(Difficulty::Professional);
        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.difficulty, Difficulty::Professional);
        assert_eq!(snapshot.player.pos, PLAYER_START);
        assert_eq!(snapshot.opponent.pos, OPPONENT_START);
        assert_eq!(snapshot.ball.pos, BALL_START);
        assert_eq!(snapshot.right_goal.pos, Vec2::new(750.0, 250.0));
        assert_eq!(snapshot.score, Score::default());
    }

    #[test]
    fn test_difficulty_fixed_for_session() {
        let mut session = running(Difficulty::Rookie);
        assert!(!session.select_difficulty(Difficulty::Legendary));
        assert_eq!(session.state().unwrap().difficulty(), Difficulty::Rookie);
    }

    #[test]
    fn test_first_frame_has_zero_dt() {
        let mut session = running(Difficulty::Rookie);
        session.frame(10.0);
        assert_eq!(session.state().unwrap().opponent.pos, OPPONENT_START);

        session.frame(10.1);
        let moved = OPPONENT_START - session.state().unwrap().opponent.pos;
        assert!((moved - Vec2::splat(7.5)).abs().max_element() < 1e-3);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut session = running(Difficulty::Legendary);
        session.frame(0.0);
        session.frame(5.0);
        let moved = OPPONENT_START - session.state().unwrap().opponent.pos;
        let cap = 230.0 * MAX_FRAME_DT;
        assert!((moved - Vec2::splat(cap)).abs().max_element() < 1e-3);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut session = running(Difficulty::Legendary);
        session.pointer_moved(Vec2::new(280.0, 209.0));
        for i in 0..10 {
            session.frame(i as f64 / 60.0);
        }
        session.toggle_pause();
        assert_eq!(session.phase(), Phase::Paused);

        let frozen = session.state().unwrap().clone();
        session.pointer_moved(Vec2::new(700.0, 500.0));
        for i in 0..30 {
            assert!(session.frame(1.0 + i as f64 / 60.0).is_empty());
            assert!(session.advance(1.0 / 60.0).is_empty());
        }
        assert_eq!(session.state().unwrap(), &frozen);
    }

    #[test]
    fn test_paused_time_is_discarded() {
        let mut session = running(Difficulty::Rookie);
        session.frame(1.0);
        session.toggle_pause();
        session.frame(50.0);
        session.toggle_pause();

        // Resume frame is dt = 0 even though 49 s went by
        session.frame(60.0);
        assert_eq!(session.state().unwrap().opponent.pos, OPPONENT_START);
    }

    #[test]
    fn test_focus_regain_clears_manual_pause() {
        let mut session = running(Difficulty::Rookie);
        session.toggle_pause();
        assert_eq!(session.phase(), Phase::Paused);

        // Focus loss while already paused keeps it paused
        session.focus_changed(false);
        assert_eq!(session.phase(), Phase::Paused);

        session.focus_changed(true);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_visibility_pauses_and_resumes() {
        let mut session = running(Difficulty::Rookie);
        session.visibility_changed(false);
        assert_eq!(session.phase(), Phase::Paused);
        session.visibility_changed(true);
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_focus_ignored_in_menu() {
        let mut session = Session::default();
        session.focus_changed(false);
        session.toggle_pause();
        assert_eq!(session.phase(), Phase::Menu);
    }

    #[test]
    fn test_pointer_applies_on_next_tick() {
        let mut session = running(Difficulty::Rookie);
        session.pointer_moved(Vec2::new(400.0, 500.0));
        assert_eq!(session.state().unwrap().player.pos, PLAYER_START);

        session.advance(0.0);
        assert_eq!(session.state().unwrap().player.pos, Vec2::new(360.0, 470.0));
    }

    #[test]
    fn test_restart_resets_to_kickoff() {
        let mut session = running(Difficulty::Legendary);
        {
            // Score a goal by rolling the ball into the right mouth
            let state = session.state.as_mut().unwrap();
            state.ball.pos = Vec2::new(760.0, 300.0);
        }
        session.pointer_moved(Vec2::new(50.0, 50.0));
        session.advance(1.0 / 60.0);
        assert_eq!(session.snapshot().unwrap().score.player, 1);

        session.restart();
        assert_eq!(session.phase(), Phase::Menu);
        assert!(session.snapshot().is_none());

        session.select_difficulty(Difficulty::Rookie);
        assert_eq!(session.state().unwrap(), &MatchState::new(Difficulty::Rookie));
    }
}
