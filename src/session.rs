//! Frame driver for the simulation
//!
//! The session is the only writer of [`GameState`]. Input handlers offer
//! intents here; they are checked against the current state right away (so the
//! caller gets a yes/no) and applied at the start of the next update. Each
//! update clamps the frame time, runs the fixed-order tick in equal sub-steps,
//! fans the frame's events out to the registered sinks, and returns a snapshot.

use crate::config::Config;
use crate::consts::*;
use crate::events::{EventSink, GameEvent};
use crate::sim::mode::transition_allowed;
use crate::sim::state::{GameState, ModeKind, Snapshot};
use crate::sim::tick::{Direction, Intent, TickInput, adjust_power, tick};

/// Sanitise a frame delta: non-finite becomes 0, then clamp to `[0, MAX_FRAME_DT]`
pub fn clamp_frame_dt(frame_dt: f32) -> f32 {
    if frame_dt.is_finite() {
        frame_dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

/// Sub-step count and size covering `dt` with steps no longer than `SIM_DT`
pub fn substeps(dt: f32) -> (u32, f32) {
    let n = ((dt / SIM_DT).ceil() as u32).clamp(1, MAX_SUBSTEPS);
    (n, dt / n as f32)
}

pub struct Session {
    config: Config,
    state: GameState,
    pending: Vec<Intent>,
    sinks: Vec<Box<dyn EventSink>>,
    last_events: Vec<GameEvent>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Session {
    pub fn new(config: Config) -> Self {
        let state = GameState::new(&config.court);
        Self {
            config,
            state,
            pending: Vec::new(),
            sinks: Vec::new(),
            last_events: Vec::new(),
        }
    }

    /// Register an observer for every future event
    pub fn add_sink(&mut self, sink: impl EventSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Events delivered by the most recent update
    pub fn last_events(&self) -> &[GameEvent] {
        &self.last_events
    }

    /// Intents waiting for the next update
    pub fn pending_intents(&self) -> &[Intent] {
        &self.pending
    }

    /// Advance by one frame
    pub fn update(&mut self, frame_dt: f32) -> Snapshot {
        let dt = clamp_frame_dt(frame_dt);
        if dt != frame_dt {
            log::debug!("Frame dt {frame_dt} clamped to {dt}");
        }

        let (steps, step_dt) = substeps(dt);
        let mut input = TickInput {
            intents: std::mem::take(&mut self.pending),
        };
        for _ in 0..steps {
            tick(&mut self.state, &self.config, &input, step_dt);
            // Intents apply once, on the first sub-step
            input.intents.clear();
        }

        self.last_events = self.state.drain_events();
        for event in &self.last_events {
            for sink in self.sinks.iter_mut() {
                sink.on_event(event);
            }
        }

        self.state.snapshot()
    }

    fn offer(&mut self, intent: Intent, allowed: bool) -> bool {
        if allowed {
            self.pending.push(intent);
        } else {
            log::debug!("Intent {intent:?} refused");
        }
        allowed
    }

    pub fn move_ball(&mut self, direction: Direction) -> bool {
        let allowed = self.state.can_move();
        self.offer(Intent::Move(direction), allowed)
    }

    /// Applied immediately; clamping makes it safe outside the tick
    pub fn adjust_power(&mut self, increase: bool) -> bool {
        adjust_power(&mut self.state, increase)
    }

    pub fn shoot(&mut self) -> bool {
        let allowed = self.state.can_shoot() && !self.pending.contains(&Intent::Shoot);
        self.offer(Intent::Shoot, allowed)
    }

    pub fn reset_ball(&mut self) -> bool {
        self.offer(Intent::ResetBall, true)
    }

    pub fn set_game_mode(&mut self, kind: ModeKind) -> bool {
        let allowed = transition_allowed(self.state.mode.kind(), kind);
        self.offer(Intent::SetGameMode(kind), allowed)
    }

    /// Free <-> timed
    pub fn toggle_timed(&mut self) -> bool {
        let allowed = self.state.mode.kind() != ModeKind::RealGame;
        self.offer(Intent::ToggleTimed, allowed)
    }

    /// Free <-> two-team game
    pub fn toggle_real_game(&mut self) -> bool {
        let allowed = self.state.mode.kind() != ModeKind::Timed;
        self.offer(Intent::ToggleRealGame, allowed)
    }

    pub fn reset_game_stats(&mut self) -> bool {
        self.offer(Intent::ResetGameStats, true)
    }

    pub fn reset_game(&mut self) -> bool {
        self.offer(Intent::ResetGame, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameMode;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_frame_dt_sanitised() {
        assert_eq!(clamp_frame_dt(f32::NAN), 0.0);
        assert_eq!(clamp_frame_dt(f32::INFINITY), 0.0);
        assert_eq!(clamp_frame_dt(-0.5), 0.0);
        assert_eq!(clamp_frame_dt(5.0), MAX_FRAME_DT);
        assert_eq!(clamp_frame_dt(0.02), 0.02);
    }

    #[test]
    fn test_substeps_cover_frame() {
        assert_eq!(substeps(0.0), (1, 0.0));
        let (n, step) = substeps(0.04);
        assert_eq!(n, 3);
        assert!(step <= SIM_DT + 1e-6);
        let (n, _) = substeps(MAX_FRAME_DT);
        assert!(n <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_hitch_only_advances_clamped_time() {
        let mut session = Session::default();
        let snap = session.update(3.0);
        assert!((snap.time - f64::from(MAX_FRAME_DT)).abs() < 1e-6);
        let snap = session.update(f32::NAN);
        assert!((snap.time - f64::from(MAX_FRAME_DT)).abs() < 1e-6);
    }

    #[test]
    fn test_intents_wait_for_update() {
        let mut session = Session::default();
        assert!(session.shoot());
        assert!(!session.snapshot().is_in_flight);
        assert_eq!(session.pending_intents(), &[Intent::Shoot]);
        // A second shot in the same frame is refused
        assert!(!session.shoot());

        let snap = session.update(SIM_DT);
        assert!(snap.is_in_flight);
        assert_eq!(snap.score.shot_attempts, 1);
        assert!(session.pending_intents().is_empty());
        assert!(!session.shoot());
        assert!(!session.move_ball(Direction::Left));
    }

    #[test]
    fn test_power_applies_immediately() {
        let mut session = Session::default();
        assert!(session.adjust_power(true));
        assert_eq!(session.snapshot().shot_power, 55);
    }

    #[test]
    fn test_mode_offer_guard() {
        let mut session = Session::default();
        assert!(!session.set_game_mode(ModeKind::Free));
        assert!(session.toggle_real_game());
        session.update(SIM_DT);
        assert!(!session.toggle_timed());
        assert!(!session.set_game_mode(ModeKind::Timed));
        assert!(matches!(session.snapshot().mode, GameMode::RealGame { quarter: 1, .. }));
    }

    #[test]
    fn test_sinks_receive_frame_events() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = Session::default();
        let sink_seen = Rc::clone(&seen);
        session.add_sink(move |e: &GameEvent| sink_seen.borrow_mut().push(e.clone()));

        session.shoot();
        session.update(SIM_DT);
        assert_eq!(seen.borrow().as_slice(), &[GameEvent::ShotReleased]);
        assert_eq!(session.last_events(), &[GameEvent::ShotReleased]);

        session.update(SIM_DT);
        assert!(session.last_events().is_empty());
    }

    proptest! {
        #[test]
        fn prop_update_never_goes_non_finite(
            dts in proptest::collection::vec(-1.0f32..1.0, 1..200),
            shoot_every in 1usize..50,
        ) {
            let mut session = Session::default();
            for (i, dt) in dts.into_iter().enumerate() {
                if i % shoot_every == 0 {
                    session.shoot();
                    session.adjust_power(i % 2 == 0);
                }
                let snap = session.update(dt);
                prop_assert!(snap.ball_position.is_finite());
                prop_assert!(snap.ball_velocity.is_finite());
                prop_assert!(snap.score.shots_made <= snap.score.shot_attempts);
            }
        }
    }
}
