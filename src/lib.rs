//! Brick Pong - a two-sided brick-breaker match
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, levels, rounds)
//! - `policy`: Paddle decision policies (heuristic opponent, idle)
//! - `game`: Match driver pairing a simulation with one policy per side
//! - `observe` / `reward` / `env`: Interface for external learning agents
//! - `snapshot`: Read-only per-tick view for renderers
//! - `tuning`: Data-driven game balance

pub mod env;
pub mod game;
pub mod observe;
pub mod policy;
pub mod reward;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use env::{BrickPongEnv, EnvStep};
pub use game::{Match, MatchInput};
pub use policy::{HeuristicPolicy, IdlePolicy, PaddleAction, PaddlePolicy};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Simulated milliseconds per tick (60 Hz)
    pub const TICK_MS: f64 = 1000.0 / 60.0;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 1200.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PLAYER_PADDLE_SPEED: f32 = 20.0;
    pub const OPPONENT_PADDLE_SPEED: f32 = 12.0;
    /// Distance of each paddle's top edge from its baseline
    pub const PADDLE_BASELINE_OFFSET: f32 = 60.0;
    pub const OPPONENT_PADDLE_Y: f32 = 40.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BASE_BALL_SPEED: f32 = 5.0;
    /// Per-component speed cap as a multiple of the base speed
    pub const MAX_SPEED_FACTOR: f32 = 2.5;
    /// Side-wall bounce jitter as a fraction of the base speed
    pub const WALL_JITTER: f32 = 0.2;
    pub const TRAIL_LENGTH: usize = 5;
    pub const MAX_BALLS: usize = 6;
    pub const BALL_MULTIPLY_INTERVAL_MS: f64 = 30_000.0;

    /// Brick grid
    pub const BRICK_ROWS: usize = 8;
    pub const BRICK_COLS: usize = 14;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 25.0;
    pub const BRICK_GAP: f32 = 5.0;
    pub const BRICK_TOP_MARGIN: f32 = 280.0;
    pub const BRICK_POINTS: u64 = 10;
    pub const MOVING_BRICK_SPEED: f32 = 2.0;

    /// Power-ups
    pub const POWER_UP_SIZE: f32 = 20.0;
    pub const POWER_UP_SPEED: f32 = 3.0;
    pub const POWER_UP_CHANCE: f64 = 0.25;
    pub const SCORE_BONUS: u64 = 20;
    pub const LASER_HALF_WIDTH: f32 = 30.0;

    /// Round flow
    pub const MAX_BALLS_LOST: u32 = 5;
    pub const ADVANCE_THRESHOLD: f32 = 0.2;
    pub const ADVANCE_COUNTDOWN_MS: f64 = 30_000.0;
    pub const SUMMARY_TIMEOUT_MS: f64 = 15_000.0;
}
