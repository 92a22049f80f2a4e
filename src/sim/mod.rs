//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only (no wall clock)
//! - Fixed per-tick order
//! - No rendering, audio or platform dependencies

pub mod bounds;
pub mod collision;
pub mod court;
pub mod integrator;
pub mod mode;
pub mod shot;
pub mod state;
pub mod tick;

pub use collision::{Contacts, reflect_velocity, resolve_collisions};
pub use court::{Hoop, HoopSide};
pub use state::{
    Ball, BallStatus, Feedback, FeedbackKind, GameMode, GameState, GameSummary, ModeKind,
    ScoreState, ShotAttempt, ShotOutcome, Snapshot, Winner,
};
pub use tick::{Direction, Intent, TickInput, tick};
