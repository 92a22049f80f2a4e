//! Court geometry, physics tuning and game rules
//!
//! Loaded once at startup (JSON) and handed to the simulation by reference;
//! nothing in `sim` mutates it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Court, hoop and ball dimensions (meters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtGeometry {
    pub court_length: f32,
    pub court_width: f32,
    /// Floor slab thickness; the playing surface sits at half of it
    pub floor_thickness: f32,
    pub rim_height: f32,
    pub rim_radius: f32,
    pub rim_tube_radius: f32,
    pub backboard_width: f32,
    pub backboard_height: f32,
    pub backboard_thickness: f32,
    /// Clearance between the board and the rim tube
    pub board_to_rim_gap: f32,
    /// Rim centre offset from the backboard plane toward mid-court
    pub rim_inset: f32,
    pub ball_radius: f32,
    /// Shots released farther than this from the hoop score three
    pub three_point_radius: f32,
}

impl Default for CourtGeometry {
    fn default() -> Self {
        Self {
            court_length: 30.0,
            court_width: 15.0,
            floor_thickness: 0.2,
            rim_height: 3.05,
            rim_radius: 0.45,
            rim_tube_radius: 0.03,
            backboard_width: 1.8,
            backboard_height: 1.05,
            backboard_thickness: 0.05,
            board_to_rim_gap: 0.4,
            rim_inset: 0.05,
            ball_radius: 0.132,
            three_point_radius: 6.75,
        }
    }
}

impl CourtGeometry {
    #[inline]
    pub fn half_length(&self) -> f32 {
        self.court_length / 2.0
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.court_width / 2.0
    }

    /// Height of the playing surface
    #[inline]
    pub fn floor_y(&self) -> f32 {
        self.floor_thickness / 2.0
    }

    /// Ball centre height when resting on the floor
    #[inline]
    pub fn resting_height(&self) -> f32 {
        self.floor_y() + self.ball_radius
    }

    /// Distance from the baseline to the backboard plane
    #[inline]
    pub fn rim_to_baseline(&self) -> f32 {
        self.rim_tube_radius + self.backboard_thickness / 2.0 + self.board_to_rim_gap
    }
}

/// Restitution, friction and gravity
///
/// Fixed for the life of a session; no collision takes per-call overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Vertical acceleration (m/s², negative is down)
    pub gravity: f32,
    pub floor_restitution: f32,
    /// Horizontal velocity retained per floor contact
    pub floor_friction: f32,
    /// Ball comes to rest once every velocity component is below this
    pub settle_speed: f32,
    pub backboard_restitution: f32,
    /// Speed retained after a rim contact
    pub rim_energy_retention: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: -9.8,
            floor_restitution: 0.6,
            floor_friction: 0.8,
            settle_speed: 0.5,
            backboard_restitution: 0.8,
            rim_energy_retention: 0.7,
        }
    }
}

/// Scoring windows, debounce timers and game-mode durations (seconds unless noted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Make test is suppressed this long after release (ascent)
    pub score_delay: f32,
    /// Miss test is suppressed this long after release
    pub miss_delay: f32,
    /// Cooldown after a resolved attempt before the next shot
    pub next_shot_delay: f32,
    /// Rim opening = rim radius minus this margin
    pub rim_opening_margin: f32,
    /// Make window above rim height (m)
    pub make_window_above: f32,
    /// Make window below rim height (m, exclusive)
    pub make_window_below: f32,
    /// Combo streak lengths that raise the bonus by one point each
    pub combo_thresholds: Vec<u32>,
    /// "Near floor" band above resting height (m)
    pub dead_ball_height: f32,
    /// A ball slower than this on every axis is dead (m/s)
    pub dead_ball_speed: f32,
    /// Air ball margin beyond the court edges (m)
    pub air_ball_margin: f32,
    pub air_ball_ceiling: f32,
    /// Out-of-bounds box margin beyond the court edges (m)
    pub out_of_bounds_margin: f32,
    pub out_of_bounds_ceiling: f32,
    pub out_of_bounds_delay: f32,
    pub weak_shot_delay: f32,
    /// Weak-shot zone depth from each baseline (m)
    pub weak_shot_baseline_zone: f32,
    /// Weak-shot zone depth from each sideline (m)
    pub weak_shot_sideline_zone: f32,
    pub timed_duration: f32,
    pub quarter_duration: f32,
    pub quarters: u8,
    /// Stats are cleared this long after a timed run or game ends
    pub auto_reset_delay: f32,
    pub shot_feedback_secs: f32,
    pub game_over_feedback_secs: f32,
    pub reset_feedback_secs: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            score_delay: 0.5,
            miss_delay: 1.0,
            next_shot_delay: 3.0,
            rim_opening_margin: 0.05,
            make_window_above: 0.2,
            make_window_below: 0.1,
            combo_thresholds: vec![3, 5, 8, 12],
            dead_ball_height: 0.5,
            dead_ball_speed: 2.0,
            air_ball_margin: 1.0,
            air_ball_ceiling: 15.0,
            out_of_bounds_margin: 0.5,
            out_of_bounds_ceiling: 20.0,
            out_of_bounds_delay: 1.5,
            weak_shot_delay: 3.0,
            weak_shot_baseline_zone: 8.0,
            weak_shot_sideline_zone: 5.0,
            timed_duration: 60.0,
            quarter_duration: 120.0,
            quarters: 4,
            auto_reset_delay: 5.0,
            shot_feedback_secs: 2.5,
            game_over_feedback_secs: 5.0,
            reset_feedback_secs: 3.5,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub court: CourtGeometry,
    pub physics: PhysicsTuning,
    pub rules: Rules,
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::invalid(field, format!("must be finite and > 0, got {value}")));
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::invalid(field, format!("must be finite and >= 0, got {value}")));
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::invalid(field, format!("must be within [0, 1], got {value}")));
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.court;
        positive("court.court_length", c.court_length)?;
        positive("court.court_width", c.court_width)?;
        non_negative("court.floor_thickness", c.floor_thickness)?;
        positive("court.rim_height", c.rim_height)?;
        positive("court.rim_radius", c.rim_radius)?;
        non_negative("court.rim_tube_radius", c.rim_tube_radius)?;
        positive("court.backboard_width", c.backboard_width)?;
        positive("court.backboard_height", c.backboard_height)?;
        positive("court.backboard_thickness", c.backboard_thickness)?;
        non_negative("court.board_to_rim_gap", c.board_to_rim_gap)?;
        non_negative("court.rim_inset", c.rim_inset)?;
        positive("court.ball_radius", c.ball_radius)?;
        positive("court.three_point_radius", c.three_point_radius)?;
        if c.rim_to_baseline() + c.rim_inset >= c.half_length() {
            return Err(ConfigError::invalid(
                "court.court_length",
                "hoops must sit inside the court",
            ));
        }

        let p = &self.physics;
        if !p.gravity.is_finite() || p.gravity >= 0.0 {
            return Err(ConfigError::invalid(
                "physics.gravity",
                format!("must be finite and < 0, got {}", p.gravity),
            ));
        }
        unit_interval("physics.floor_restitution", p.floor_restitution)?;
        unit_interval("physics.floor_friction", p.floor_friction)?;
        unit_interval("physics.backboard_restitution", p.backboard_restitution)?;
        unit_interval("physics.rim_energy_retention", p.rim_energy_retention)?;
        non_negative("physics.settle_speed", p.settle_speed)?;

        let r = &self.rules;
        non_negative("rules.score_delay", r.score_delay)?;
        non_negative("rules.miss_delay", r.miss_delay)?;
        non_negative("rules.next_shot_delay", r.next_shot_delay)?;
        non_negative("rules.rim_opening_margin", r.rim_opening_margin)?;
        if r.rim_opening_margin >= c.rim_radius {
            return Err(ConfigError::invalid(
                "rules.rim_opening_margin",
                "rim opening must have a positive radius",
            ));
        }
        non_negative("rules.make_window_above", r.make_window_above)?;
        non_negative("rules.make_window_below", r.make_window_below)?;
        if r.combo_thresholds.is_empty() {
            return Err(ConfigError::invalid("rules.combo_thresholds", "must not be empty"));
        }
        if r.combo_thresholds.windows(2).any(|w| w[0] >= w[1]) || r.combo_thresholds[0] == 0 {
            return Err(ConfigError::invalid(
                "rules.combo_thresholds",
                "must be strictly increasing and start above zero",
            ));
        }
        non_negative("rules.dead_ball_height", r.dead_ball_height)?;
        positive("rules.dead_ball_speed", r.dead_ball_speed)?;
        non_negative("rules.air_ball_margin", r.air_ball_margin)?;
        positive("rules.air_ball_ceiling", r.air_ball_ceiling)?;
        non_negative("rules.out_of_bounds_margin", r.out_of_bounds_margin)?;
        positive("rules.out_of_bounds_ceiling", r.out_of_bounds_ceiling)?;
        non_negative("rules.out_of_bounds_delay", r.out_of_bounds_delay)?;
        non_negative("rules.weak_shot_delay", r.weak_shot_delay)?;
        non_negative("rules.weak_shot_baseline_zone", r.weak_shot_baseline_zone)?;
        non_negative("rules.weak_shot_sideline_zone", r.weak_shot_sideline_zone)?;
        positive("rules.timed_duration", r.timed_duration)?;
        positive("rules.quarter_duration", r.quarter_duration)?;
        if r.quarters == 0 {
            return Err(ConfigError::invalid("rules.quarters", "must be at least 1"));
        }
        non_negative("rules.auto_reset_delay", r.auto_reset_delay)?;
        non_negative("rules.shot_feedback_secs", r.shot_feedback_secs)?;
        non_negative("rules.game_over_feedback_secs", r.game_over_feedback_secs)?;
        non_negative("rules.reset_feedback_secs", r.reset_feedback_secs)?;
        Ok(())
    }

    /// Parse and validate a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load from `path`, falling back to defaults on any error
    ///
    /// A missing or unreadable file is routine and only warned about; a file
    /// that parses but fails validation is logged as an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(err) if err.is_recoverable() => {
                log::warn!(
                    "Using default config ({}): {}",
                    path.as_ref().display(),
                    err
                );
                Self::default()
            }
            Err(err) => {
                log::error!(
                    "Rejected config {}, using defaults: {}",
                    path.as_ref().display(),
                    err
                );
                Self::default()
            }
        }
    }
}
