//! Boundary monitor and ball recovery
//!
//! Two debounced conditions bring a stray ball back: leaving the out-of-bounds
//! box, and a "weak shot" dribbling to a stop far from centre court. Both must
//! hold continuously; a single tick without the condition resets its timer.

use glam::Vec3;

use super::court::baseline_spot;
use super::state::GameState;
use crate::config::{CourtGeometry, Rules};
use crate::events::GameEvent;

/// Condition the monitor saw this tick, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsCondition {
    OutOfBounds,
    WeakShot,
    InPlay,
}

/// Outside the box extending `out_of_bounds_margin` past every edge, or above the ceiling
pub fn is_out_of_bounds(pos: Vec3, court: &CourtGeometry, rules: &Rules) -> bool {
    let max_x = court.half_length() + rules.out_of_bounds_margin;
    let max_z = court.half_width() + rules.out_of_bounds_margin;
    pos.x.abs() > max_x || pos.z.abs() > max_z || pos.y > rules.out_of_bounds_ceiling
}

/// Slow ball near the floor, away from the middle of the court
pub fn is_weak_shot(pos: Vec3, vel: Vec3, court: &CourtGeometry, rules: &Rules) -> bool {
    let near_floor = pos.y <= court.resting_height() + rules.dead_ball_height;
    let slow = vel.abs().max_element() < rules.dead_ball_speed;
    let far_from_centre = pos.x.abs() > court.half_length() - rules.weak_shot_baseline_zone
        || pos.z.abs() > court.half_width() - rules.weak_shot_sideline_zone;
    near_floor && slow && far_from_centre
}

pub fn classify(pos: Vec3, vel: Vec3, court: &CourtGeometry, rules: &Rules) -> BoundsCondition {
    if is_out_of_bounds(pos, court, rules) {
        BoundsCondition::OutOfBounds
    } else if is_weak_shot(pos, vel, court, rules) {
        BoundsCondition::WeakShot
    } else {
        BoundsCondition::InPlay
    }
}

/// Advance the debounce timers; returns true if the ball was relocated
///
/// The out-of-bounds box is watched every tick, so a ball that rolls out and
/// stops there is still recovered. The weak-shot condition only applies in
/// flight.
pub fn monitor_bounds(
    state: &mut GameState,
    court: &CourtGeometry,
    rules: &Rules,
    dt: f32,
) -> bool {
    let pos = state.ball.position;
    let condition = if state.ball.in_flight {
        classify(pos, state.ball.velocity, court, rules)
    } else if is_out_of_bounds(pos, court, rules) {
        BoundsCondition::OutOfBounds
    } else {
        BoundsCondition::InPlay
    };

    let timers = &mut state.bounds;
    let expired = match condition {
        BoundsCondition::OutOfBounds => {
            if !timers.is_out_of_bounds {
                log::debug!("Ball left the court at {pos:?}");
            }
            timers.is_out_of_bounds = true;
            timers.weak_shot = 0.0;
            timers.out_of_bounds += dt;
            timers.out_of_bounds >= rules.out_of_bounds_delay
        }
        BoundsCondition::WeakShot => {
            timers.is_out_of_bounds = false;
            timers.out_of_bounds = 0.0;
            timers.weak_shot += dt;
            timers.weak_shot >= rules.weak_shot_delay
        }
        BoundsCondition::InPlay => {
            timers.clear();
            false
        }
    };

    if expired {
        return_to_court(state, court);
    }
    expired
}

/// Place the ball at rest on the baseline of the last shot's target side
pub fn return_to_court(state: &mut GameState, court: &CourtGeometry) {
    let side = state.last_target;
    state.ball.place_at_rest(baseline_spot(side, court));
    state.bounds.clear();
    log::info!("Ball returned to the {} baseline", side.as_str());
    state.emit(GameEvent::BallReturned(side));
}
