//! Fixed timestep simulation tick
//!
//! One call advances the court by `dt` in a fixed order: queued intents,
//! game-mode clock, shot cooldown, ball physics, boundary monitor, outcome
//! detection, then cosmetic bookkeeping.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::bounds::monitor_bounds;
use super::collision::resolve_collisions;
use super::integrator::{age_trail, integrate, roll, update_spin};
use super::mode;
use super::shot::{detect_outcome, shoot};
use super::state::{GameState, ModeKind};
use crate::config::{Config, CourtGeometry};
use crate::consts::*;
use crate::events::GameEvent;

/// Arrow-key nudge direction (forward is toward negative z)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Backward,
}

impl Direction {
    pub fn offset(self, step: f32) -> Vec3 {
        match self {
            Direction::Left => Vec3::new(-step, 0.0, 0.0),
            Direction::Right => Vec3::new(step, 0.0, 0.0),
            Direction::Forward => Vec3::new(0.0, 0.0, -step),
            Direction::Backward => Vec3::new(0.0, 0.0, step),
        }
    }
}

/// Player command, applied at a tick boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Move(Direction),
    AdjustPower { increase: bool },
    Shoot,
    ResetBall,
    SetGameMode(ModeKind),
    ToggleTimed,
    ToggleRealGame,
    ResetGameStats,
    ResetGame,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied in order before anything else moves
    pub intents: Vec<Intent>,
}

impl TickInput {
    pub fn with(intent: Intent) -> Self {
        Self {
            intents: vec![intent],
        }
    }
}

/// Nudge a resting ball, keeping it one radius inside the court lines
pub fn move_ball(state: &mut GameState, court: &CourtGeometry, direction: Direction) -> bool {
    if !state.can_move() {
        log::debug!("Move ignored while the ball is in flight");
        return false;
    }

    let r = court.ball_radius;
    let max_x = court.half_length() - r;
    let max_z = court.half_width() - r;
    let before = state.ball.position;
    let mut next = before + direction.offset(MOVE_STEP);
    next.x = next.x.clamp(-max_x, max_x);
    next.z = next.z.clamp(-max_z, max_z);

    state.ball.position = next;
    state.ball.velocity = Vec3::ZERO;
    roll(&mut state.ball, next - before, r);
    true
}

/// Step shot power by 5 within [0, 100]
pub fn adjust_power(state: &mut GameState, increase: bool) -> bool {
    let power = if increase {
        state.shot_power.saturating_add(POWER_STEP).min(MAX_POWER)
    } else {
        state.shot_power.saturating_sub(POWER_STEP).max(MIN_POWER)
    };
    let changed = power != state.shot_power;
    state.shot_power = power;
    changed
}

/// Apply one intent; false when a guard rejected it
pub fn apply_intent(state: &mut GameState, config: &Config, intent: Intent) -> bool {
    match intent {
        Intent::Move(direction) => move_ball(state, &config.court, direction),
        Intent::AdjustPower { increase } => adjust_power(state, increase),
        Intent::Shoot => shoot(state, &config.court),
        Intent::ResetBall => {
            state.reset_ball(&config.court);
            log::info!("Ball reset to centre court");
            true
        }
        Intent::SetGameMode(kind) => mode::set_game_mode(state, config, kind),
        Intent::ToggleTimed => mode::toggle_timed(state, config),
        Intent::ToggleRealGame => mode::toggle_real_game(state, config),
        Intent::ResetGameStats => {
            mode::reset_game_stats(state);
            true
        }
        Intent::ResetGame => {
            mode::reset_game(state, config);
            true
        }
    }
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, config: &Config, input: &TickInput, dt: f32) {
    for &intent in &input.intents {
        if !apply_intent(state, config, intent) {
            log::debug!("Intent {intent:?} rejected");
        }
    }

    mode::update_mode(state, config, dt);

    if state.next_shot_cooldown > 0.0 {
        state.next_shot_cooldown = (state.next_shot_cooldown - dt).max(0.0);
    }

    // Physics
    if state.ball.in_flight {
        integrate(&mut state.ball, &config.physics, dt);
        let contacts = resolve_collisions(
            &mut state.ball,
            state.attempt.as_mut(),
            &config.court,
            &config.physics,
        );
        if contacts.audible_bounce() {
            state.emit(GameEvent::Bounce);
        }
    }

    monitor_bounds(state, &config.court, &config.rules, dt);

    // Runs on a settled or relocated ball too, so those attempts resolve as misses
    detect_outcome(state, config);

    age_trail(&mut state.ball, dt);
    update_spin(&mut state.ball, dt);
    if state
        .feedback
        .as_ref()
        .is_some_and(|f| state.time >= f.expires_at)
    {
        state.feedback = None;
    }

    state.time += f64::from(dt);
    state.time_ticks += 1;
}
