//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod level;
pub mod rect;
pub mod scoring;
pub mod state;
pub mod tick;

pub use effects::{AppliedEffect, EffectTargets};
pub use level::{Layout, generate};
pub use rect::Rect;
pub use scoring::{RoundSummary, ball_loss_penalty, round_score};
pub use state::{
    Ball, Brick, BrickKind, BrickTally, GameEvent, GamePhase, GameState, Paddle, PowerUp,
    PowerUpKind, Side, SideStats, Sides,
};
pub use tick::{TickInput, start_round, tick};
