//! Data-driven game balance
//!
//! Every gameplay constant lives here so layouts, physics and reward shaping
//! can be tuned from a JSON file without recompiling.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::observe::ObservationConfig;
use crate::reward::RewardConfig;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    /// Tuning file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tuning file is not valid JSON for `Tuning`
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Values parsed but are inconsistent
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Highest accepted `start_level`
pub const MAX_START_LEVEL: u32 = 1_000;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    /// Simulated milliseconds per tick
    pub tick_ms: f64,

    // === Paddles ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub player_paddle_speed: f32,
    pub opponent_paddle_speed: f32,
    /// Top edge of the opponent paddle
    pub opponent_paddle_y: f32,
    /// Top edge of the player paddle, measured up from the bottom baseline
    pub player_paddle_offset: f32,

    // === Balls ===
    pub ball_radius: f32,
    pub base_ball_speed: f32,
    pub max_speed_factor: f32,
    pub wall_jitter: f32,
    pub trail_length: usize,
    pub max_balls: usize,
    pub ball_multiply_interval_ms: f64,

    // === Bricks ===
    pub brick_rows: usize,
    pub brick_cols: usize,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_gap: f32,
    pub brick_top_margin: f32,
    /// Live points per destroyed brick, multiplied by `level + 1`
    pub brick_points: u64,
    pub moving_brick_min_level: u32,
    pub moving_brick_chance: f64,
    pub moving_brick_speed: f32,

    // === Power-ups ===
    pub power_up_size: f32,
    pub power_up_speed: f32,
    pub power_up_chance: f64,
    pub score_bonus: u64,
    pub laser_half_width: f32,

    // === Round flow ===
    pub start_level: u32,
    pub max_balls_lost: u32,
    /// Fraction of the breakable snapshot at which the advance countdown starts
    pub advance_threshold: f32,
    pub advance_countdown_ms: f64,
    pub summary_timeout_ms: f64,

    // === Agent interface ===
    pub reward: RewardConfig,
    pub observation: ObservationConfig,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            tick_ms: TICK_MS,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            player_paddle_speed: PLAYER_PADDLE_SPEED,
            opponent_paddle_speed: OPPONENT_PADDLE_SPEED,
            opponent_paddle_y: OPPONENT_PADDLE_Y,
            player_paddle_offset: PADDLE_BASELINE_OFFSET,

            ball_radius: BALL_RADIUS,
            base_ball_speed: BASE_BALL_SPEED,
            max_speed_factor: MAX_SPEED_FACTOR,
            wall_jitter: WALL_JITTER,
            trail_length: TRAIL_LENGTH,
            max_balls: MAX_BALLS,
            ball_multiply_interval_ms: BALL_MULTIPLY_INTERVAL_MS,

            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_gap: BRICK_GAP,
            brick_top_margin: BRICK_TOP_MARGIN,
            brick_points: BRICK_POINTS,
            moving_brick_min_level: 5,
            moving_brick_chance: 0.1,
            moving_brick_speed: MOVING_BRICK_SPEED,

            power_up_size: POWER_UP_SIZE,
            power_up_speed: POWER_UP_SPEED,
            power_up_chance: POWER_UP_CHANCE,
            score_bonus: SCORE_BONUS,
            laser_half_width: LASER_HALF_WIDTH,

            start_level: 0,
            max_balls_lost: MAX_BALLS_LOST,
            advance_threshold: ADVANCE_THRESHOLD,
            advance_countdown_ms: ADVANCE_COUNTDOWN_MS,
            summary_timeout_ms: SUMMARY_TIMEOUT_MS,

            reward: RewardConfig::default(),
            observation: ObservationConfig::default(),
        }
    }
}

impl Tuning {
    /// Per-component velocity cap
    #[inline]
    pub fn max_ball_speed(&self) -> f32 {
        self.base_ball_speed * self.max_speed_factor
    }

    /// Top edge of the player paddle
    #[inline]
    pub fn player_paddle_y(&self) -> f32 {
        self.field_height - self.player_paddle_offset
    }

    /// Total width of the brick grid
    pub fn grid_width(&self) -> f32 {
        self.brick_cols as f32 * (self.brick_width + self.brick_gap) - self.brick_gap
    }

    /// Parse and validate tuning from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load tuning, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the values describe a playable field
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| Err(TuningError::Invalid(msg));

        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return invalid(format!(
                "field must be positive, got {}x{}",
                self.field_width, self.field_height
            ));
        }
        if self.tick_ms <= 0.0 {
            return invalid(format!("tick_ms must be positive, got {}", self.tick_ms));
        }
        if self.paddle_width <= 0.0 || self.paddle_width * 2.0 > self.field_width {
            return invalid(format!(
                "paddle_width {} must fit twice within field_width {}",
                self.paddle_width, self.field_width
            ));
        }
        if self.opponent_paddle_y + self.paddle_height >= self.player_paddle_y() {
            return invalid("paddles overlap vertically".to_string());
        }
        if self.ball_radius <= 0.0 || self.base_ball_speed <= 0.0 {
            return invalid("ball radius and speed must be positive".to_string());
        }
        if self.max_speed_factor < 1.0 {
            return invalid(format!(
                "max_speed_factor must be at least 1, got {}",
                self.max_speed_factor
            ));
        }
        if self.wall_jitter.is_nan() || self.wall_jitter < 0.0 {
            return invalid(format!("wall_jitter must be non-negative, got {}", self.wall_jitter));
        }
        // One serve ball per side
        if self.max_balls < 2 {
            return invalid(format!("max_balls must be at least 2, got {}", self.max_balls));
        }
        if self.brick_rows == 0 || self.brick_cols == 0 {
            return invalid("brick grid must have rows and columns".to_string());
        }
        if self.grid_width() > self.field_width {
            return invalid(format!(
                "brick grid width {} exceeds field width {}",
                self.grid_width(),
                self.field_width
            ));
        }
        for (name, p) in [
            ("power_up_chance", self.power_up_chance),
            ("moving_brick_chance", self.moving_brick_chance),
            ("advance_threshold", self.advance_threshold as f64),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{name} must be within [0, 1], got {p}"));
            }
        }
        if self.max_balls_lost == 0 {
            return invalid("max_balls_lost must be at least 1".to_string());
        }
        if self.start_level > MAX_START_LEVEL {
            return invalid(format!(
                "start_level must be at most {MAX_START_LEVEL}, got {}",
                self.start_level
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.player_paddle_y(), 740.0);
        assert_eq!(tuning.max_ball_speed(), 12.5);
        assert!(tuning.grid_width() <= tuning.field_width);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = Tuning::from_json_str(r#"{ "max_balls": 4, "start_level": 3 }"#).unwrap();
        assert_eq!(tuning.max_balls, 4);
        assert_eq!(tuning.start_level, 3);
        assert_eq!(tuning.field_width, FIELD_WIDTH);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::default();
        let json = tuning.to_json_pretty().unwrap();
        assert_eq!(Tuning::from_json_str(&json).unwrap(), tuning);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json_str(r#"{ "max_balls": 0 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json_str(r#"{ "power_up_chance": 1.5 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json_str(r#"{ "brick_cols": 40 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json_str(r#"{ "start_level": 4000000000 }"#),
            Err(TuningError::Invalid(_))
        ));
        assert!(matches!(
            Tuning::from_json_str("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let tuning = Tuning::load_or_default("/nonexistent/brick-pong-tuning.json");
        assert_eq!(tuning, Tuning::default());
    }
}
