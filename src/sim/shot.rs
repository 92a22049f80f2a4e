//! Shot release and outcome detection
//!
//! A shot aims at the nearer hoop. Once released the detector watches the
//! attempt until it is either a make (descending through the target rim
//! opening) or a miss (dead on the floor, or an air ball), then starts the
//! next-shot cooldown.

use glam::Vec3;

use super::court::{Hoop, nearer_hoop};
use super::state::{FeedbackKind, GameMode, GameState, ShotAttempt, ShotOutcome};
use crate::config::{Config, CourtGeometry, Rules};
use crate::consts::*;
use crate::events::GameEvent;

/// Release velocity for a shot from `from` toward `target` at `power` percent
///
/// The horizontal part follows the 3D aim direction; the vertical part is a
/// fixed boost so every shot arcs.
pub fn launch_velocity(from: Vec3, target: Vec3, power: u8) -> Vec3 {
    let dir = (target - from).normalize_or_zero();
    let speed = BASE_LAUNCH_SPEED * f32::from(power.min(MAX_POWER)) / 100.0;
    Vec3::new(
        dir.x * speed * LAUNCH_HORIZONTAL_FACTOR,
        speed * LAUNCH_VERTICAL_FACTOR,
        dir.z * speed * LAUNCH_HORIZONTAL_FACTOR,
    )
}

/// 3 beyond the arc (strictly), 2 otherwise
#[inline]
pub fn points_for_distance(distance: f32, three_point_radius: f32) -> u32 {
    if distance > three_point_radius { 3 } else { 2 }
}

/// Bonus for a streak: 1-based index of the highest threshold reached, 0 below the first
pub fn combo_bonus(combo: u32, thresholds: &[u32]) -> u32 {
    thresholds.iter().take_while(|&&t| combo >= t).count() as u32
}

/// Release the ball toward the nearer hoop
///
/// Returns false (and changes nothing) while the ball is in flight or the
/// cooldown is running.
pub fn shoot(state: &mut GameState, court: &CourtGeometry) -> bool {
    if !state.can_shoot() {
        log::debug!(
            "Shot ignored (in_flight={}, cooldown={:.2})",
            state.ball.in_flight,
            state.next_shot_cooldown
        );
        return false;
    }

    let origin = state.ball.position;
    let target = nearer_hoop(origin, court);
    let hoop = Hoop::new(target, court);
    let velocity = launch_velocity(origin, hoop.rim_center, state.shot_power);

    state.ball.launch(velocity);
    state.attempt = Some(ShotAttempt::new(origin, target, state.time));
    state.last_target = target;
    state.bounds.clear();
    state.score.shot_attempts += 1;
    state.score.last_shot_was_swish = false;

    log::info!(
        "Shot #{} at {}% toward {} hoop from ({:.2}, {:.2})",
        state.score.shot_attempts,
        state.shot_power,
        target.as_str(),
        origin.x,
        origin.z
    );
    state.emit(GameEvent::ShotReleased);
    true
}

/// Make test for the live attempt, without side effects
pub fn is_make(state: &GameState, attempt: &ShotAttempt, court: &CourtGeometry, rules: &Rules) -> bool {
    if attempt.elapsed(state.time) < rules.score_delay {
        return false;
    }
    let hoop = Hoop::new(attempt.target, court);
    let pos = state.ball.position;
    hoop.within_opening(pos, court.rim_radius - rules.rim_opening_margin)
        && pos.y > court.rim_height - rules.make_window_below
        && pos.y <= court.rim_height + rules.make_window_above
        && state.ball.velocity.y < 0.0
}

/// Miss test for the live attempt; `Some(air_ball)` when it fires
pub fn miss_kind(
    state: &GameState,
    attempt: &ShotAttempt,
    court: &CourtGeometry,
    rules: &Rules,
) -> Option<bool> {
    if attempt.elapsed(state.time) < rules.miss_delay {
        return None;
    }
    let pos = state.ball.position;
    let dead = pos.y <= court.resting_height() + rules.dead_ball_height
        && state.ball.velocity.abs().max_element() < rules.dead_ball_speed;
    let air_ball = pos.x.abs() > court.half_length() + rules.air_ball_margin
        || pos.z.abs() > court.half_width() + rules.air_ball_margin
        || pos.y > rules.air_ball_ceiling;

    if air_ball {
        Some(true)
    } else if dead {
        Some(false)
    } else {
        None
    }
}

/// Resolve the live attempt if its make or miss condition holds
///
/// Inert when there is no attempt or it is already resolved.
pub fn detect_outcome(state: &mut GameState, config: &Config) -> Option<ShotOutcome> {
    let attempt = state.attempt.clone().filter(|a| !a.result_determined)?;
    let court = &config.court;
    let rules = &config.rules;

    let outcome = if is_make(state, &attempt, court, rules) {
        score_make(state, &attempt, config)
    } else {
        let air_ball = miss_kind(state, &attempt, court, rules)?;
        record_miss(state, air_ball)
    };

    if let Some(live) = state.attempt.as_mut() {
        live.result_determined = true;
    }
    state.next_shot_cooldown = rules.next_shot_delay;
    state.show_feedback(FeedbackKind::Shot(outcome), rules.shot_feedback_secs);

    let event = match outcome {
        ShotOutcome::Made {
            points,
            is_swish,
            combo_bonus,
            ..
        } => GameEvent::ShotResolved {
            success: true,
            points,
            is_swish,
            combo_bonus,
        },
        ShotOutcome::Missed { .. } => GameEvent::ShotResolved {
            success: false,
            points: 0,
            is_swish: false,
            combo_bonus: 0,
        },
    };
    state.emit(event);
    Some(outcome)
}

fn score_make(state: &mut GameState, attempt: &ShotAttempt, config: &Config) -> ShotOutcome {
    let hoop = Hoop::new(attempt.target, &config.court);
    let distance = attempt.origin.distance(hoop.rim_center);
    let points = points_for_distance(distance, config.court.three_point_radius);
    let is_swish = !attempt.rim_touched;

    let score = &mut state.score;
    score.current_combo += 1;
    score.max_combo = score.max_combo.max(score.current_combo);
    let bonus = combo_bonus(score.current_combo, &config.rules.combo_thresholds);
    score.shots_made += 1;
    score.total_score += points + bonus;
    score.last_shot_was_swish = is_swish;
    if is_swish {
        score.swish_shots += 1;
    }
    let combo = score.current_combo;

    log::info!(
        "{}{} from {:.2}m (combo x{}, +{} bonus) total={} made={}/{}",
        if points == 3 { "Three-pointer" } else { "Two-pointer" },
        if is_swish { ", swish" } else { "" },
        distance,
        combo,
        bonus,
        state.score.total_score,
        state.score.shots_made,
        state.score.shot_attempts
    );

    if let GameMode::RealGame {
        home_score,
        away_score,
        ..
    } = &mut state.mode
    {
        // Team bookkeeping counts the basket only, not the combo bonus
        if attempt.origin.x < 0.0 {
            *home_score += points;
        } else {
            *away_score += points;
        }
        let (home, away) = (*home_score, *away_score);
        state.emit(GameEvent::ScoreChanged { home, away });
    }

    ShotOutcome::Made {
        points,
        is_swish,
        combo_bonus: bonus,
        combo,
    }
}

fn record_miss(state: &mut GameState, air_ball: bool) -> ShotOutcome {
    state.score.current_combo = 0;
    state.score.last_shot_was_swish = false;
    log::info!(
        "Missed{} made={}/{}",
        if air_ball { " (air ball)" } else { "" },
        state.score.shots_made,
        state.score.shot_attempts
    );
    ShotOutcome::Missed { air_ball }
}
