//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]; the presentation only
//! ever sees a [`Snapshot`].

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::court::HoopSide;
use crate::config::{CourtGeometry, Rules};
use crate::consts::*;
use crate::events::GameEvent;

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub position: Vec3,
    /// Seconds since the point was recorded
    pub age: f32,
}

/// The basketball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub position: Vec3,
    pub velocity: Vec3,
    pub in_flight: bool,
    /// Cosmetic spin axis (world space)
    pub rotation_axis: Vec3,
    /// Cosmetic spin rate (rad/s)
    pub rotation_speed: f32,
    /// Accumulated cosmetic orientation
    pub orientation: Quat,
    /// Recent positions, oldest first
    #[serde(skip)]
    pub trail: Vec<TrailPoint>,
}

impl Ball {
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            in_flight: false,
            rotation_axis: Vec3::Y,
            rotation_speed: 0.0,
            orientation: Quat::IDENTITY,
            trail: Vec::with_capacity(TRAIL_LENGTH),
        }
    }

    /// Record a position to the trail, dropping the oldest past capacity
    pub fn record_trail(&mut self, position: Vec3) {
        if self.trail.len() >= TRAIL_LENGTH {
            self.trail.remove(0);
        }
        self.trail.push(TrailPoint { position, age: 0.0 });
    }

    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Stop the ball dead at `position`
    pub fn place_at_rest(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.in_flight = false;
        self.rotation_speed = 0.0;
        self.clear_trail();
    }

    /// Put the ball in flight with the given velocity
    pub fn launch(&mut self, velocity: Vec3) {
        self.velocity = velocity;
        self.in_flight = true;
        self.clear_trail();
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

/// A shot in progress, from release until its result is determined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotAttempt {
    /// Ball position at release
    pub origin: Vec3,
    pub target: HoopSide,
    /// Simulation time of release (seconds)
    pub release_time: f64,
    pub result_determined: bool,
    /// Set by any rim contact during the flight
    pub rim_touched: bool,
}

impl ShotAttempt {
    pub fn new(origin: Vec3, target: HoopSide, now: f64) -> Self {
        Self {
            origin,
            target,
            release_time: now,
            result_determined: false,
            rim_touched: false,
        }
    }

    #[inline]
    pub fn elapsed(&self, now: f64) -> f32 {
        (now - self.release_time) as f32
    }
}

/// Shooting statistics for the current mode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    pub total_score: u32,
    pub shot_attempts: u32,
    pub shots_made: u32,
    pub swish_shots: u32,
    pub current_combo: u32,
    pub max_combo: u32,
    pub last_shot_was_swish: bool,
}

impl ScoreState {
    /// Made / attempted, 0 before the first attempt
    pub fn shooting_ratio(&self) -> f32 {
        if self.shot_attempts == 0 {
            0.0
        } else {
            self.shots_made as f32 / self.shot_attempts as f32
        }
    }

    /// Shooting ratio as a percentage (0-100)
    pub fn shooting_percentage(&self) -> f32 {
        self.shooting_ratio() * 100.0
    }
}

/// Mode selector without the per-mode counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeKind {
    Free,
    Timed,
    RealGame,
}

impl ModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKind::Free => "free",
            ModeKind::Timed => "timed",
            ModeKind::RealGame => "realGame",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "free" => Some(ModeKind::Free),
            "timed" => Some(ModeKind::Timed),
            "real" | "realgame" | "real_game" => Some(ModeKind::RealGame),
            _ => None,
        }
    }
}

/// Active game mode and its counters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Unlimited shooting practice
    #[default]
    Free,
    /// Single countdown
    Timed { time_remaining: f32 },
    /// Quarter-based two-team game
    RealGame {
        /// 1-based
        quarter: u8,
        quarter_time_remaining: f32,
        home_score: u32,
        away_score: u32,
    },
}

impl GameMode {
    pub fn timed(rules: &Rules) -> Self {
        GameMode::Timed {
            time_remaining: rules.timed_duration,
        }
    }

    pub fn real_game(rules: &Rules) -> Self {
        GameMode::RealGame {
            quarter: 1,
            quarter_time_remaining: rules.quarter_duration,
            home_score: 0,
            away_score: 0,
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            GameMode::Free => ModeKind::Free,
            GameMode::Timed { .. } => ModeKind::Timed,
            GameMode::RealGame { .. } => ModeKind::RealGame,
        }
    }

    /// A timed run or game is in progress
    pub fn is_active(&self) -> bool {
        !matches!(self, GameMode::Free)
    }

    /// (home, away) in a two-team game
    pub fn team_scores(&self) -> Option<(u32, u32)> {
        match *self {
            GameMode::RealGame {
                home_score,
                away_score,
                ..
            } => Some((home_score, away_score)),
            _ => None,
        }
    }
}

/// Two-team game result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Home,
    Away,
    Tie,
}

impl Winner {
    pub fn from_scores(home: u32, away: u32) -> Self {
        match home.cmp(&away) {
            std::cmp::Ordering::Greater => Winner::Home,
            std::cmp::Ordering::Less => Winner::Away,
            std::cmp::Ordering::Equal => Winner::Tie,
        }
    }
}

/// Final numbers of a finished timed run or game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub mode: ModeKind,
    pub total_score: u32,
    pub shots_made: u32,
    pub shot_attempts: u32,
    pub swish_shots: u32,
    pub max_combo: u32,
    pub home_score: u32,
    pub away_score: u32,
    /// Only for two-team games
    pub winner: Option<Winner>,
}

/// How a shot attempt was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotOutcome {
    Made {
        points: u32,
        is_swish: bool,
        combo_bonus: u32,
        /// Streak length including this make
        combo: u32,
    },
    Missed {
        /// Left the court or sailed too high, rather than dying on the floor
        air_ball: bool,
    },
}

/// Transient message for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Shot(ShotOutcome),
    GameOver(GameSummary),
    GameReset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    /// Simulation time after which the message is gone
    pub expires_at: f64,
}

/// Status line for the ball
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallStatus {
    Ready,
    InFlight,
    OutOfBounds,
}

/// Debounce timers of the boundary monitor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundaryTimers {
    /// Continuous seconds outside the out-of-bounds box
    pub out_of_bounds: f32,
    /// Continuous seconds in the weak-shot condition
    pub weak_shot: f32,
    pub is_out_of_bounds: bool,
}

impl BoundaryTimers {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Complete simulation state (single owner: the tick)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub ball: Ball,
    /// Live shot, resolved or not, until the next shot or a reset
    pub attempt: Option<ShotAttempt>,
    /// Side of the most recent shot; recovery relocates here
    pub last_target: HoopSide,
    pub score: ScoreState,
    pub mode: GameMode,
    /// Percent
    pub shot_power: u8,
    /// Seconds before another shot is allowed
    pub next_shot_cooldown: f32,
    pub bounds: BoundaryTimers,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub feedback: Option<Feedback>,
    /// Simulation time at which stats auto-reset after a finished game
    pub pending_stats_reset_at: Option<f64>,
    /// Outbound events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state: ball at centre court, free mode, zero stats
    pub fn new(court: &CourtGeometry) -> Self {
        Self {
            ball: Ball::at_rest(center_spot(court)),
            attempt: None,
            last_target: HoopSide::Left,
            score: ScoreState::default(),
            mode: GameMode::Free,
            shot_power: DEFAULT_POWER,
            next_shot_cooldown: 0.0,
            bounds: BoundaryTimers::default(),
            time: 0.0,
            time_ticks: 0,
            feedback: None,
            pending_stats_reset_at: None,
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced so far
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// An unresolved attempt exists
    pub fn attempt_pending(&self) -> bool {
        self.attempt.as_ref().is_some_and(|a| !a.result_determined)
    }

    pub fn can_move(&self) -> bool {
        !self.ball.in_flight
    }

    pub fn can_shoot(&self) -> bool {
        !self.ball.in_flight && self.next_shot_cooldown <= 0.0
    }

    /// Drop every pending timer and the live attempt so nothing stale can fire later
    pub fn cancel_timers(&mut self) {
        self.next_shot_cooldown = 0.0;
        self.bounds.clear();
        self.attempt = None;
    }

    /// Ball back to centre court at rest with default power
    pub fn reset_ball(&mut self, court: &CourtGeometry) {
        self.ball.place_at_rest(center_spot(court));
        self.ball.orientation = Quat::IDENTITY;
        self.shot_power = DEFAULT_POWER;
        self.cancel_timers();
    }

    pub fn show_feedback(&mut self, kind: FeedbackKind, duration: f32) {
        self.feedback = Some(Feedback {
            kind,
            expires_at: self.time + f64::from(duration),
        });
    }

    pub fn ball_status(&self) -> BallStatus {
        if self.ball.in_flight {
            BallStatus::InFlight
        } else if self.bounds.is_out_of_bounds {
            BallStatus::OutOfBounds
        } else {
            BallStatus::Ready
        }
    }

    pub fn summary(&self) -> GameSummary {
        let (home_score, away_score) = self.mode.team_scores().unwrap_or((0, 0));
        GameSummary {
            mode: self.mode.kind(),
            total_score: self.score.total_score,
            shots_made: self.score.shots_made,
            shot_attempts: self.score.shot_attempts,
            swish_shots: self.score.swish_shots,
            max_combo: self.score.max_combo,
            home_score,
            away_score,
            winner: self
                .mode
                .team_scores()
                .map(|(home, away)| Winner::from_scores(home, away)),
        }
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            ball_position: self.ball.position,
            ball_velocity: self.ball.velocity,
            is_in_flight: self.ball.in_flight,
            ball_orientation: self.ball.orientation,
            trail: self.ball.trail.iter().map(|p| p.position).collect(),
            score: self.score.clone(),
            shooting_percentage: self.score.shooting_percentage(),
            mode: self.mode,
            shot_power: self.shot_power,
            ball_status: self.ball_status(),
            next_shot_in: self.next_shot_cooldown.max(0.0),
            feedback: self.feedback.clone(),
            time: self.time,
        }
    }
}

/// Ball start position at centre court
pub fn center_spot(court: &CourtGeometry) -> Vec3 {
    Vec3::new(0.0, court.resting_height(), 0.0)
}

/// Per-frame read-only view of the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ball_position: Vec3,
    pub ball_velocity: Vec3,
    pub is_in_flight: bool,
    pub ball_orientation: Quat,
    /// Oldest first
    pub trail: Vec<Vec3>,
    pub score: ScoreState,
    pub shooting_percentage: f32,
    pub mode: GameMode,
    pub shot_power: u8,
    pub ball_status: BallStatus,
    /// Seconds until the next shot is allowed (0 = available)
    pub next_shot_in: f32,
    pub feedback: Option<Feedback>,
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_at_centre() {
        let court = CourtGeometry::default();
        let state = GameState::new(&court);
        assert_eq!(state.ball.position, Vec3::new(0.0, court.resting_height(), 0.0));
        assert!(!state.ball.in_flight);
        assert_eq!(state.shot_power, DEFAULT_POWER);
        assert_eq!(state.mode, GameMode::Free);
        assert!(state.can_shoot());
        assert_eq!(state.ball_status(), BallStatus::Ready);
    }

    #[test]
    fn test_shooting_percentage_without_attempts() {
        let score = ScoreState::default();
        assert_eq!(score.shooting_ratio(), 0.0);
        assert_eq!(score.shooting_percentage(), 0.0);

        let score = ScoreState {
            shot_attempts: 4,
            shots_made: 1,
            ..Default::default()
        };
        assert!((score.shooting_percentage() - 25.0).abs() < 1e-5);
    }

    #[test]
    fn test_trail_is_bounded() {
        let mut ball = Ball::at_rest(Vec3::ZERO);
        for i in 0..(TRAIL_LENGTH + 5) {
            ball.record_trail(Vec3::new(i as f32, 0.0, 0.0));
        }
        assert_eq!(ball.trail.len(), TRAIL_LENGTH);
        // Oldest dropped first
        assert_eq!(ball.trail[0].position.x, 5.0);
    }

    #[test]
    fn test_winner_from_scores() {
        assert_eq!(Winner::from_scores(10, 4), Winner::Home);
        assert_eq!(Winner::from_scores(4, 10), Winner::Away);
        assert_eq!(Winner::from_scores(7, 7), Winner::Tie);
    }

    #[test]
    fn test_cancel_timers() {
        let court = CourtGeometry::default();
        let mut state = GameState::new(&court);
        state.next_shot_cooldown = 2.0;
        state.bounds.out_of_bounds = 1.0;
        state.bounds.weak_shot = 2.0;
        state.attempt = Some(ShotAttempt::new(Vec3::ZERO, HoopSide::Left, 0.0));
        state.cancel_timers();
        assert_eq!(state.next_shot_cooldown, 0.0);
        assert_eq!(state.bounds, BoundaryTimers::default());
        assert!(state.attempt.is_none());
    }

    #[test]
    fn test_mode_kind_from_str() {
        assert_eq!(ModeKind::from_str("Timed"), Some(ModeKind::Timed));
        assert_eq!(ModeKind::from_str("real"), Some(ModeKind::RealGame));
        assert_eq!(ModeKind::from_str("arcade"), None);
    }
}
