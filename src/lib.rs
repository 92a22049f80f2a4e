//! Hoop Shot - a shootable basketball on a full court
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, collisions, scoring, game modes)
//! - `session`: Frame driver owning the game state, intent queue and event fan-out
//! - `events`: Outbound notifications for audio/scoreboard collaborators
//! - `config`: Court geometry, physics tuning and game rules

pub mod config;
pub mod error;
pub mod events;
pub mod session;
pub mod sim;

pub use config::{Config, CourtGeometry, PhysicsTuning, Rules};
pub use error::ConfigError;
pub use events::{EventSink, GameEvent};
pub use session::Session;

use glam::{Vec2, Vec3};

/// Simulation constants that are not part of the court configuration
pub mod consts {
    /// Largest simulation step (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame gaps longer than this are treated as a hitch and clamped
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Trail buffer capacity
    pub const TRAIL_LENGTH: usize = 15;
    /// Trail points older than this are dropped (seconds)
    pub const TRAIL_FADE_TIME: f32 = 0.5;

    /// Shot power bounds and step (percent)
    pub const MIN_POWER: u8 = 0;
    pub const MAX_POWER: u8 = 100;
    pub const POWER_STEP: u8 = 5;
    pub const DEFAULT_POWER: u8 = 50;

    /// Ball nudge per move intent (meters)
    pub const MOVE_STEP: f32 = 0.30;

    /// Launch speed at 100% power (m/s)
    pub const BASE_LAUNCH_SPEED: f32 = 12.0;
    /// Launch split: horizontal share and vertical boost
    pub const LAUNCH_HORIZONTAL_FACTOR: f32 = 0.7;
    pub const LAUNCH_VERTICAL_FACTOR: f32 = 1.2;

    /// Cosmetic spin: angular speed per m/s of ball speed
    pub const SPIN_PER_SPEED: f32 = 2.0;
    /// Below this speed the spin decays instead of tracking velocity
    pub const SPIN_TRACK_MIN_SPEED: f32 = 0.1;
    pub const SPIN_DECAY: f32 = 0.95;
    pub const SPIN_STOP: f32 = 0.01;

    /// Rebounds faster than this emit a bounce event
    pub const AUDIBLE_BOUNCE_SPEED: f32 = 1.0;
}

/// Horizontal (x, z) part of a vector
#[inline]
pub fn horizontal(v: Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Distance between two points ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    horizontal(a - b).length()
}

/// Unit vector pointing from `from` to `to` in the horizontal plane
///
/// Coincident points give `Vec3::ZERO` rather than NaN.
#[inline]
pub fn horizontal_normal(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let a = Vec3::new(0.0, 10.0, 0.0);
        let b = Vec3::new(3.0, -5.0, 4.0);
        assert!((horizontal_distance(a, b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_horizontal_normal_degenerate() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(horizontal_normal(p, p + Vec3::Y), Vec3::ZERO);
        let n = horizontal_normal(Vec3::ZERO, Vec3::new(2.0, 7.0, 0.0));
        assert!((n - Vec3::X).length() < 1e-6);
    }
}
