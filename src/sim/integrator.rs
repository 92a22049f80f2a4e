//! Ball kinematics
//!
//! Semi-implicit Euler: gravity updates velocity first, then the new velocity
//! moves the ball. Contact response lives in `collision`.

use glam::{Quat, Vec3};

use super::state::Ball;
use crate::config::PhysicsTuning;
use crate::consts::*;

/// Advance a ball in flight by `dt`; a ball at rest is left untouched
pub fn integrate(ball: &mut Ball, physics: &PhysicsTuning, dt: f32) {
    if !ball.in_flight {
        return;
    }

    // Trail holds where the ball was before this step
    let previous = ball.position;
    ball.record_trail(previous);

    ball.velocity.y += physics.gravity * dt;
    ball.position += ball.velocity * dt;
}

/// Age trail points and drop the faded ones
pub fn age_trail(ball: &mut Ball, dt: f32) {
    for point in ball.trail.iter_mut() {
        point.age += dt;
    }
    ball.trail.retain(|p| p.age < TRAIL_FADE_TIME);
}

/// Cosmetic spin derived from velocity
///
/// Rolls around the horizontal axis perpendicular to the dominant direction of
/// travel; once the ball is nearly still the spin winds down.
pub fn update_spin(ball: &mut Ball, dt: f32) {
    let speed = ball.velocity.length();

    if speed > SPIN_TRACK_MIN_SPEED {
        let dir = ball.velocity / speed;
        ball.rotation_axis = if dir.x.abs() > dir.z.abs() {
            Vec3::new(0.0, 0.0, if dir.x > 0.0 { -1.0 } else { 1.0 })
        } else {
            Vec3::new(if dir.z > 0.0 { 1.0 } else { -1.0 }, 0.0, 0.0)
        };
        ball.rotation_speed = speed * SPIN_PER_SPEED;
    } else {
        ball.rotation_speed *= SPIN_DECAY;
        if ball.rotation_speed <= SPIN_STOP {
            ball.rotation_speed = 0.0;
            return;
        }
    }

    let angle = ball.rotation_speed * dt;
    spin(ball, angle);
}

/// Roll the ball along the floor by a horizontal displacement (no velocity change)
pub fn roll(ball: &mut Ball, displacement: Vec3, radius: f32) {
    let distance = displacement.length();
    if distance <= 0.0 || radius <= 0.0 {
        return;
    }
    // Rolling without slipping: axis = up x direction
    let axis = Vec3::Y.cross(displacement / distance).normalize_or_zero();
    if axis == Vec3::ZERO {
        return;
    }
    ball.rotation_axis = axis;
    spin(ball, distance / radius);
}

fn spin(ball: &mut Ball, angle: f32) {
    if angle == 0.0 || !angle.is_finite() {
        return;
    }
    let delta = Quat::from_axis_angle(ball.rotation_axis, angle);
    ball.orientation = (delta * ball.orientation).normalize();
}
