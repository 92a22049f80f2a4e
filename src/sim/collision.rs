//! Collision detection and response against the floor, backboards and rims
//!
//! Checks run in a fixed order (floor, left board, right board, left rim,
//! right rim) and are independent: several may fire in the same tick.

use glam::Vec3;

use super::court::{Hoop, HoopSide};
use super::state::{Ball, ShotAttempt};
use crate::config::{CourtGeometry, PhysicsTuning};
use crate::consts::AUDIBLE_BOUNCE_SPEED;
use crate::horizontal_normal;

/// What the ball touched during one resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contacts {
    /// Floor contact with the rebound speed after restitution
    pub floor: Option<f32>,
    /// Ball came to rest on this pass
    pub settled: bool,
    pub backboards: Vec<HoopSide>,
    pub rims: Vec<HoopSide>,
}

impl Contacts {
    pub fn any(&self) -> bool {
        self.floor.is_some() || !self.backboards.is_empty() || !self.rims.is_empty()
    }

    /// Floor bounce hard enough to be heard
    pub fn audible_bounce(&self) -> bool {
        self.floor.is_some_and(|rebound| rebound > AUDIBLE_BOUNCE_SPEED)
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Resolve every contact for this tick
///
/// `attempt` receives the rim-touch mark used for swish detection.
pub fn resolve_collisions(
    ball: &mut Ball,
    attempt: Option<&mut ShotAttempt>,
    court: &CourtGeometry,
    physics: &PhysicsTuning,
) -> Contacts {
    let mut contacts = Contacts::default();
    let hoops = Hoop::pair(court);

    if let Some(rebound) = floor_collision(ball, court, physics) {
        contacts.floor = Some(rebound);
        contacts.settled = !ball.in_flight;
    }

    for hoop in &hoops {
        if backboard_collision(ball, hoop, court.ball_radius, physics) {
            contacts.backboards.push(hoop.side);
        }
    }

    for hoop in &hoops {
        if rim_collision(ball, hoop, court.ball_radius, physics) {
            contacts.rims.push(hoop.side);
        }
    }

    if !contacts.rims.is_empty() {
        if let Some(attempt) = attempt {
            attempt.rim_touched = true;
        }
    }

    if contacts.any() {
        log::debug!(
            "contacts floor={:?} boards={:?} rims={:?} settled={}",
            contacts.floor,
            contacts.backboards,
            contacts.rims,
            contacts.settled
        );
    }

    contacts
}

/// Bounce off the floor; returns the vertical rebound speed on contact
///
/// A contact that leaves every velocity component under the settle speed puts
/// the ball to rest.
pub fn floor_collision(
    ball: &mut Ball,
    court: &CourtGeometry,
    physics: &PhysicsTuning,
) -> Option<f32> {
    let rest_y = court.resting_height();
    if ball.position.y > rest_y {
        return None;
    }

    ball.position.y = rest_y;
    ball.velocity.y = -ball.velocity.y * physics.floor_restitution;
    ball.velocity.x *= physics.floor_friction;
    ball.velocity.z *= physics.floor_friction;
    let rebound = ball.velocity.y.abs();

    let v = ball.velocity;
    if v.x.abs() < physics.settle_speed
        && v.y.abs() < physics.settle_speed
        && v.z.abs() < physics.settle_speed
    {
        ball.in_flight = false;
        ball.velocity = Vec3::ZERO;
        ball.clear_trail();
    }

    Some(rebound)
}

/// Bounce off a backboard face
pub fn backboard_collision(
    ball: &mut Ball,
    hoop: &Hoop,
    ball_radius: f32,
    physics: &PhysicsTuning,
) -> bool {
    if !hoop.backboard_overlap(ball.position, ball_radius) {
        return false;
    }
    ball.position.x = hoop.board_contact_x(ball_radius);
    ball.velocity.x = -ball.velocity.x * physics.backboard_restitution;
    true
}

/// Deflect off a rim
///
/// The contact normal is horizontal (rim centre to ball), a deliberate
/// simplification of the torus surface. A ball dead-centre over the rim has no
/// defined normal and only loses energy.
pub fn rim_collision(
    ball: &mut Ball,
    hoop: &Hoop,
    ball_radius: f32,
    physics: &PhysicsTuning,
) -> bool {
    if !hoop.rim_overlap(ball.position, ball_radius) {
        return false;
    }
    let normal = horizontal_normal(hoop.rim_center, ball.position);
    ball.velocity = reflect_velocity(ball.velocity, normal) * physics.rim_energy_retention;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    use crate::sim::integrator::integrate;

    fn flying_ball(position: Vec3, velocity: Vec3) -> Ball {
        let mut ball = Ball::at_rest(position);
        ball.launch(velocity);
        ball
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect_velocity(Vec3::new(100.0, 5.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!((reflected.y - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_floor_bounce_restitution_and_friction() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let mut ball = flying_ball(Vec3::new(0.0, 0.2, 0.0), Vec3::new(5.0, -10.0, -2.0));

        let rebound = floor_collision(&mut ball, &court, &physics);
        assert!((rebound.unwrap() - 6.0).abs() < 1e-5);
        assert_eq!(ball.position.y, court.resting_height());
        assert!((ball.velocity.y - 6.0).abs() < 1e-5);
        assert!((ball.velocity.x - 4.0).abs() < 1e-5);
        assert!((ball.velocity.z + 1.6).abs() < 1e-5);
        assert!(ball.in_flight);
    }

    #[test]
    fn test_floor_settles_slow_ball() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let mut ball = flying_ball(Vec3::new(0.0, 0.1, 0.0), Vec3::new(0.4, -0.5, 0.1));
        ball.record_trail(Vec3::ONE);

        floor_collision(&mut ball, &court, &physics);
        assert!(!ball.in_flight);
        assert_eq!(ball.velocity, Vec3::ZERO);
        assert!(ball.trail.is_empty());
    }

    #[test]
    fn test_floor_no_contact_above() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let mut ball = flying_ball(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(floor_collision(&mut ball, &court, &physics).is_none());
        assert_eq!(ball.velocity.y, -1.0);
    }

    #[test]
    fn test_backboard_pushes_out_and_reflects() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let hoop = Hoop::new(HoopSide::Left, &court);
        let mut ball = flying_ball(
            Vec3::new(hoop.board_x + 0.1, court.rim_height + 0.5, 0.2),
            Vec3::new(-6.0, 1.0, 0.0),
        );

        assert!(backboard_collision(&mut ball, &hoop, court.ball_radius, &physics));
        assert!((ball.position.x - hoop.board_contact_x(court.ball_radius)).abs() < 1e-6);
        assert!((ball.velocity.x - 4.8).abs() < 1e-5);
        assert_eq!(ball.velocity.y, 1.0);
    }

    #[test]
    fn test_right_backboard_mirrors() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let hoop = Hoop::new(HoopSide::Right, &court);
        let mut ball = flying_ball(
            Vec3::new(hoop.board_x - 0.1, court.rim_height + 0.5, 0.0),
            Vec3::new(6.0, 0.0, 0.0),
        );
        assert!(backboard_collision(&mut ball, &hoop, court.ball_radius, &physics));
        assert!(ball.position.x < hoop.board_x - court.backboard_thickness);
        assert!((ball.velocity.x + 4.8).abs() < 1e-5);
    }

    #[test]
    fn test_rim_reflects_horizontal_and_loses_energy() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let hoop = Hoop::new(HoopSide::Right, &court);
        // On the mid-court side of the rim, moving toward the rim centre and down
        let pos = hoop.rim_center - Vec3::new(court.rim_radius, 0.0, 0.0);
        let mut ball = flying_ball(pos, Vec3::new(4.0, -3.0, 0.0));

        assert!(rim_collision(&mut ball, &hoop, court.ball_radius, &physics));
        assert!((ball.velocity.x - (-2.8)).abs() < 1e-5);
        assert!((ball.velocity.y - (-2.1)).abs() < 1e-5);
    }

    #[test]
    fn test_rim_dead_centre_keeps_direction() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let hoop = Hoop::new(HoopSide::Left, &court);
        let mut ball = flying_ball(hoop.rim_center, Vec3::new(0.0, -5.0, 0.0));
        assert!(rim_collision(&mut ball, &hoop, court.ball_radius, &physics));
        assert!(ball.velocity.is_finite());
        assert!((ball.velocity.y - (-3.5)).abs() < 1e-5);
    }

    #[test]
    fn test_rim_contact_marks_attempt() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let hoop = Hoop::new(HoopSide::Left, &court);
        let pos = hoop.rim_center + Vec3::new(0.0, 0.0, court.rim_radius);
        let mut ball = flying_ball(pos, Vec3::new(0.0, -2.0, -1.0));
        let mut attempt = ShotAttempt::new(Vec3::new(-8.0, 0.232, 0.0), HoopSide::Left, 0.0);

        let contacts = resolve_collisions(&mut ball, Some(&mut attempt), &court, &physics);
        assert_eq!(contacts.rims, vec![HoopSide::Left]);
        assert!(attempt.rim_touched);
    }

    #[test]
    fn test_dropped_ball_converges_to_rest() {
        let court = CourtGeometry::default();
        let physics = PhysicsTuning::default();
        let mut ball = flying_ball(Vec3::new(0.0, 4.0, 0.0), Vec3::ZERO);
        let mut bounces = 0;

        for _ in 0..(60 * 30) {
            integrate(&mut ball, &physics, 1.0 / 60.0);
            let contacts = resolve_collisions(&mut ball, None, &court, &physics);
            if contacts.floor.is_some() {
                bounces += 1;
            }
            if !ball.in_flight {
                break;
            }
        }

        assert!(!ball.in_flight);
        assert!(bounces < 60, "took {bounces} floor contacts");
        assert_eq!(ball.position.y, court.resting_height());
        assert_eq!(ball.velocity, Vec3::ZERO);
    }

    proptest! {
        #[test]
        fn prop_physics_stays_finite(
            px in -16.0f32..16.0, py in 0.0f32..8.0, pz in -8.0f32..8.0,
            vx in -25.0f32..25.0, vy in -25.0f32..25.0, vz in -25.0f32..25.0,
            dt in 0.0f32..(1.0 / 60.0),
        ) {
            let court = CourtGeometry::default();
            let physics = PhysicsTuning::default();
            let mut ball = flying_ball(Vec3::new(px, py, pz), Vec3::new(vx, vy, vz));
            for _ in 0..240 {
                integrate(&mut ball, &physics, dt);
                resolve_collisions(&mut ball, None, &court, &physics);
                prop_assert!(ball.is_finite());
            }
        }

        #[test]
        fn prop_floor_never_penetrated(
            vy in -30.0f32..0.0, h in 0.3f32..10.0,
        ) {
            let court = CourtGeometry::default();
            let physics = PhysicsTuning::default();
            let mut ball = flying_ball(Vec3::new(0.0, h, 0.0), Vec3::new(0.0, vy, 0.0));
            for _ in 0..600 {
                integrate(&mut ball, &physics, 1.0 / 60.0);
                resolve_collisions(&mut ball, None, &court, &physics);
                prop_assert!(ball.position.y >= court.resting_height() - 1e-6);
            }
        }
    }
}
