//! Game mode state machine
//!
//! ```text
//! free -> timed    -> free
//! free -> realGame -> free
//! ```
//!
//! Timed and two-team games can only be entered from free play. Ending a game
//! (clock expiry or a manual toggle) drops straight back to free play, shows
//! the summary, and clears the stats a few seconds later.

use super::state::{FeedbackKind, GameMode, GameState, ModeKind, ScoreState};
use crate::config::Config;
use crate::events::GameEvent;

/// Count down the active mode's clock and run the deferred stats reset
pub fn update_mode(state: &mut GameState, config: &Config, dt: f32) {
    if let Some(deadline) = state.pending_stats_reset_at {
        if state.time >= deadline {
            reset_game_stats(state);
        }
    }

    let rules = &config.rules;
    match &mut state.mode {
        GameMode::Free => {}
        GameMode::Timed { time_remaining } => {
            *time_remaining -= dt;
            if *time_remaining <= 0.0 {
                *time_remaining = 0.0;
                log::info!("Timed run over");
                end_mode(state, config);
            }
        }
        GameMode::RealGame {
            quarter,
            quarter_time_remaining,
            ..
        } => {
            *quarter_time_remaining -= dt;
            if *quarter_time_remaining <= 0.0 {
                if *quarter < rules.quarters {
                    *quarter += 1;
                    *quarter_time_remaining = rules.quarter_duration;
                    let q = *quarter;
                    log::info!("Quarter {q} started");
                    state.emit(GameEvent::QuarterStarted(q));
                } else {
                    *quarter_time_remaining = 0.0;
                    log::info!("Final quarter over");
                    end_mode(state, config);
                }
            }
        }
    }
}

/// Whether `from -> to` is one of the four defined transitions
pub fn transition_allowed(from: ModeKind, to: ModeKind) -> bool {
    matches!(
        (from, to),
        (ModeKind::Free, ModeKind::Timed | ModeKind::RealGame)
            | (ModeKind::Timed | ModeKind::RealGame, ModeKind::Free)
    )
}

/// Request a mode; only transitions through free play are accepted
pub fn set_game_mode(state: &mut GameState, config: &Config, kind: ModeKind) -> bool {
    let from = state.mode.kind();
    if !transition_allowed(from, kind) {
        log::debug!("Mode change {} -> {} ignored", from.as_str(), kind.as_str());
        return false;
    }
    if kind == ModeKind::Free {
        end_mode(state, config);
    } else {
        start_mode(state, config, kind);
    }
    true
}

/// T key: free <-> timed
pub fn toggle_timed(state: &mut GameState, config: &Config) -> bool {
    match state.mode.kind() {
        ModeKind::Free => set_game_mode(state, config, ModeKind::Timed),
        ModeKind::Timed => set_game_mode(state, config, ModeKind::Free),
        ModeKind::RealGame => false,
    }
}

/// Y key: free <-> two-team game
pub fn toggle_real_game(state: &mut GameState, config: &Config) -> bool {
    match state.mode.kind() {
        ModeKind::Free => set_game_mode(state, config, ModeKind::RealGame),
        ModeKind::RealGame => set_game_mode(state, config, ModeKind::Free),
        ModeKind::Timed => false,
    }
}

fn fresh_mode(kind: ModeKind, config: &Config) -> GameMode {
    match kind {
        ModeKind::Free => GameMode::Free,
        ModeKind::Timed => GameMode::timed(&config.rules),
        ModeKind::RealGame => GameMode::real_game(&config.rules),
    }
}

fn start_mode(state: &mut GameState, config: &Config, kind: ModeKind) {
    state.mode = fresh_mode(kind, config);
    state.score = ScoreState::default();
    state.pending_stats_reset_at = None;
    state.cancel_timers();
    log::info!("Started {} mode", kind.as_str());

    state.emit(GameEvent::GameModeChanged(state.mode));
    if kind == ModeKind::RealGame {
        state.emit(GameEvent::QuarterStarted(1));
        state.emit(GameEvent::ScoreChanged { home: 0, away: 0 });
    }
}

/// Finish the active game: summary feedback, back to free play, stats reset scheduled
fn end_mode(state: &mut GameState, config: &Config) {
    let rules = &config.rules;
    let summary = state.summary();
    log::info!(
        "{} finished: score={} made={}/{} swishes={} max_combo={} winner={:?}",
        summary.mode.as_str(),
        summary.total_score,
        summary.shots_made,
        summary.shot_attempts,
        summary.swish_shots,
        summary.max_combo,
        summary.winner
    );

    state.mode = GameMode::Free;
    state.cancel_timers();
    state.show_feedback(
        FeedbackKind::GameOver(summary.clone()),
        rules.game_over_feedback_secs,
    );
    state.pending_stats_reset_at = Some(state.time + f64::from(rules.auto_reset_delay));

    state.emit(GameEvent::GameOver(summary));
    state.emit(GameEvent::GameModeChanged(GameMode::Free));
}

/// Zero every statistic and return to free play
pub fn reset_game_stats(state: &mut GameState) {
    let was = state.mode.kind();
    state.score = ScoreState::default();
    state.mode = GameMode::Free;
    state.pending_stats_reset_at = None;
    state.cancel_timers();
    state.ball.clear_trail();
    log::info!("Game stats reset");

    if was != ModeKind::Free {
        state.emit(GameEvent::GameModeChanged(GameMode::Free));
    }
    if was == ModeKind::RealGame {
        state.emit(GameEvent::ScoreChanged { home: 0, away: 0 });
    }
}

/// Restart the current mode from scratch without leaving it
pub fn reset_game(state: &mut GameState, config: &Config) {
    let kind = state.mode.kind();
    state.mode = fresh_mode(kind, config);
    state.score = ScoreState::default();
    state.pending_stats_reset_at = None;
    state.reset_ball(&config.court);
    state.show_feedback(FeedbackKind::GameReset, config.rules.reset_feedback_secs);
    log::info!("Game reset ({} mode)", kind.as_str());

    state.emit(GameEvent::GameModeChanged(state.mode));
    if kind == ModeKind::RealGame {
        state.emit(GameEvent::ScoreChanged { home: 0, away: 0 });
    }
}
