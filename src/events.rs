//! Outbound notifications for audio and scoreboard collaborators
//!
//! The simulation queues events while it runs; the session hands them to every
//! registered [`EventSink`] once the frame's ticks are done. Delivery is
//! fire-and-forget: sinks cannot influence the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::court::HoopSide;
use crate::sim::state::{GameMode, GameSummary};

/// Something a collaborator may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Hard floor bounce (audible)
    Bounce,
    ShotReleased,
    ShotResolved {
        success: bool,
        points: u32,
        is_swish: bool,
        combo_bonus: u32,
    },
    GameModeChanged(GameMode),
    /// Two-team scoreboard changed
    ScoreChanged { home: u32, away: u32 },
    QuarterStarted(u8),
    GameOver(GameSummary),
    /// Stray ball put back on a baseline
    BallReturned(HoopSide),
}

impl GameEvent {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Bounce => "bounce",
            GameEvent::ShotReleased => "shot_released",
            GameEvent::ShotResolved { .. } => "shot_resolved",
            GameEvent::GameModeChanged(_) => "game_mode_changed",
            GameEvent::ScoreChanged { .. } => "score_changed",
            GameEvent::QuarterStarted(_) => "quarter_started",
            GameEvent::GameOver(_) => "game_over",
            GameEvent::BallReturned(_) => "ball_returned",
        }
    }
}

/// Observer interface for presentation collaborators
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&GameEvent),
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Writes every event to the log at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &GameEvent) {
        log::debug!("event {}: {:?}", event.name(), event);
    }
}
