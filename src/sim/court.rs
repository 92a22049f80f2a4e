//! Hoop geometry for collision and scoring
//!
//! Each hoop is a backboard (an axis-aligned slab standing on the plane
//! `x = board_x`, extending toward mid-court by its thickness) plus a rim
//! circle of `rim_radius` at `rim_height`, centred `rim_inset` in front of
//! the board.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::CourtGeometry;
use crate::horizontal_distance;

/// Which end of the court a hoop (or relocation baseline) is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HoopSide {
    /// Negative x end
    #[default]
    Left,
    /// Positive x end
    Right,
}

impl HoopSide {
    /// -1 for the left end, +1 for the right end
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            HoopSide::Left => -1.0,
            HoopSide::Right => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HoopSide::Left => "left",
            HoopSide::Right => "right",
        }
    }
}

/// One backboard + rim assembly
#[derive(Debug, Clone, PartialEq)]
pub struct Hoop {
    pub side: HoopSide,
    /// Centre of the rim circle
    pub rim_center: Vec3,
    pub rim_radius: f32,
    /// Back plane of the backboard
    pub board_x: f32,
    pub board_thickness: f32,
    pub board_bottom: f32,
    pub board_top: f32,
    pub board_half_width: f32,
}

impl Hoop {
    pub fn new(side: HoopSide, court: &CourtGeometry) -> Self {
        let s = side.sign();
        let board_x = s * (court.half_length() - court.rim_to_baseline());
        let rim_x = s * (court.half_length() - court.rim_to_baseline() - court.rim_inset);
        Self {
            side,
            rim_center: Vec3::new(rim_x, court.rim_height, 0.0),
            rim_radius: court.rim_radius,
            board_x,
            board_thickness: court.backboard_thickness,
            board_bottom: court.rim_height,
            board_top: court.rim_height + court.backboard_height,
            board_half_width: court.backboard_width / 2.0,
        }
    }

    /// Left and right hoops, in resolution order
    pub fn pair(court: &CourtGeometry) -> [Hoop; 2] {
        [Hoop::new(HoopSide::Left, court), Hoop::new(HoopSide::Right, court)]
    }

    /// Unit x direction from this hoop toward mid-court
    #[inline]
    fn inward(&self) -> f32 {
        -self.side.sign()
    }

    /// x position a ball centre is pushed to when it hits the board face
    #[inline]
    pub fn board_contact_x(&self, ball_radius: f32) -> f32 {
        self.board_x + self.inward() * (self.board_thickness + ball_radius)
    }

    /// Whether a ball overlaps the backboard slab (inflated by its radius)
    pub fn backboard_overlap(&self, pos: Vec3, ball_radius: f32) -> bool {
        // Depth measured from the back plane toward mid-court
        let depth = (pos.x - self.board_x) * self.inward();
        depth >= -ball_radius
            && depth <= self.board_thickness + ball_radius
            && pos.y >= self.board_bottom - ball_radius
            && pos.y <= self.board_top + ball_radius
            && pos.z.abs() <= self.board_half_width + ball_radius
    }

    /// Whether a ball is in contact with the rim (disc test, one radius of vertical slack)
    pub fn rim_overlap(&self, pos: Vec3, ball_radius: f32) -> bool {
        horizontal_distance(pos, self.rim_center) <= self.rim_radius + ball_radius
            && (pos.y - self.rim_center.y).abs() <= ball_radius
    }

    /// Whether a ball centre is inside the horizontal rim opening disc
    #[inline]
    pub fn within_opening(&self, pos: Vec3, opening_radius: f32) -> bool {
        horizontal_distance(pos, self.rim_center) < opening_radius
    }
}

/// The hoop a shot from `pos` aims at (ties go right)
pub fn nearer_hoop(pos: Vec3, court: &CourtGeometry) -> HoopSide {
    let [left, right] = Hoop::pair(court);
    if pos.distance(left.rim_center) < pos.distance(right.rim_center) {
        HoopSide::Left
    } else {
        HoopSide::Right
    }
}

/// Where a recovered ball is placed: at rest on the chosen baseline
pub fn baseline_spot(side: HoopSide, court: &CourtGeometry) -> Vec3 {
    Vec3::new(
        side.sign() * (court.half_length() - court.ball_radius),
        court.resting_height(),
        0.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hoop_positions_mirror() {
        let court = CourtGeometry::default();
        let [left, right] = Hoop::pair(&court);
        assert!((left.rim_center.x + 14.495).abs() < 1e-4);
        assert!((right.rim_center.x - 14.495).abs() < 1e-4);
        assert_eq!(left.rim_center.y, court.rim_height);
        assert!((left.board_x + right.board_x).abs() < 1e-6);
    }

    #[test]
    fn test_backboard_overlap_faces_court() {
        let court = CourtGeometry::default();
        let [left, right] = Hoop::pair(&court);
        let r = court.ball_radius;
        let y = court.rim_height + 0.5;

        // Just in front of the left board face
        assert!(left.backboard_overlap(Vec3::new(left.board_x + 0.1, y, 0.0), r));
        // Well in front of it
        assert!(!left.backboard_overlap(Vec3::new(left.board_x + 1.0, y, 0.0), r));
        // Beside the board
        assert!(!left.backboard_overlap(Vec3::new(left.board_x + 0.1, y, 1.5), r));
        // Below the board
        assert!(!left.backboard_overlap(Vec3::new(left.board_x + 0.1, 2.0, 0.0), r));

        assert!(right.backboard_overlap(Vec3::new(right.board_x - 0.1, y, 0.0), r));
        assert!(!right.backboard_overlap(Vec3::new(right.board_x - 1.0, y, 0.0), r));
    }

    #[test]
    fn test_board_contact_x_is_in_front_of_face() {
        let court = CourtGeometry::default();
        let [left, right] = Hoop::pair(&court);
        let r = court.ball_radius;
        assert!(left.board_contact_x(r) > left.board_x);
        assert!(right.board_contact_x(r) < right.board_x);
        assert!((left.board_contact_x(r) + right.board_contact_x(r)).abs() < 1e-6);
    }

    #[test]
    fn test_rim_overlap_vertical_slack() {
        let court = CourtGeometry::default();
        let hoop = Hoop::new(HoopSide::Right, &court);
        let r = court.ball_radius;
        let edge = hoop.rim_center + Vec3::new(court.rim_radius, 0.0, 0.0);
        assert!(hoop.rim_overlap(edge, r));
        assert!(hoop.rim_overlap(edge + Vec3::Y * (r * 0.9), r));
        assert!(!hoop.rim_overlap(edge + Vec3::Y * (r * 1.1), r));
        assert!(!hoop.rim_overlap(edge + Vec3::X * (r * 1.1), r));
    }

    #[test]
    fn test_nearer_hoop() {
        let court = CourtGeometry::default();
        assert_eq!(nearer_hoop(Vec3::new(-3.0, 0.2, 0.0), &court), HoopSide::Left);
        assert_eq!(nearer_hoop(Vec3::new(3.0, 0.2, 0.0), &court), HoopSide::Right);
        assert_eq!(nearer_hoop(Vec3::new(0.0, 0.2, 2.0), &court), HoopSide::Right);
    }

    #[test]
    fn test_baseline_spot() {
        let court = CourtGeometry::default();
        let spot = baseline_spot(HoopSide::Left, &court);
        assert!((spot.x + (15.0 - 0.132)).abs() < 1e-5);
        assert_eq!(spot.y, court.resting_height());
        assert_eq!(spot.z, 0.0);
    }
}
