//! Paddle decision policies
//!
//! A policy maps what a paddle can see (its own position and the balls) to
//! one discrete action per tick. Object-safe so each side can hold a
//! `Box<dyn PaddlePolicy>`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{GameState, Paddle, Side};

/// Discrete paddle action for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaddleAction {
    MoveLeft,
    #[default]
    Stay,
    MoveRight,
}

impl PaddleAction {
    /// Decode an agent action code: 0 = stay, 1 = left, 2 = right
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PaddleAction::Stay),
            1 => Some(PaddleAction::MoveLeft),
            2 => Some(PaddleAction::MoveRight),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            PaddleAction::Stay => 0,
            PaddleAction::MoveLeft => 1,
            PaddleAction::MoveRight => 2,
        }
    }

    /// Unit horizontal direction (-1, 0 or 1)
    pub fn direction(self) -> f32 {
        match self {
            PaddleAction::MoveLeft => -1.0,
            PaddleAction::Stay => 0.0,
            PaddleAction::MoveRight => 1.0,
        }
    }
}

/// What a policy sees of its own paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaddleView {
    pub side: Side,
    pub center: Vec2,
}

impl From<&Paddle> for PaddleView {
    fn from(paddle: &Paddle) -> Self {
        Self {
            side: paddle.owner,
            center: paddle.center(),
        }
    }
}

/// What a policy sees of one ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Views for `side`'s policy
pub fn views(state: &GameState, side: Side) -> (PaddleView, Vec<BallView>) {
    let paddle = PaddleView::from(&state.paddles[side]);
    let balls = state
        .balls
        .iter()
        .map(|b| BallView {
            pos: b.pos,
            vel: b.vel,
        })
        .collect();
    (paddle, balls)
}

/// Decides one paddle action per tick
pub trait PaddlePolicy {
    fn decide(&mut self, paddle: &PaddleView, balls: &[BallView]) -> PaddleAction;

    fn name(&self) -> &'static str;
}

/// Tracks the ball vertically nearest its paddle
#[derive(Debug, Clone, Copy)]
pub struct HeuristicPolicy {
    /// No movement while the ball is within this many pixels of center
    pub dead_zone: f32,
}

impl HeuristicPolicy {
    pub const DEFAULT_DEAD_ZONE: f32 = 5.0;
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self {
            dead_zone: Self::DEFAULT_DEAD_ZONE,
        }
    }
}

impl PaddlePolicy for HeuristicPolicy {
    fn decide(&mut self, paddle: &PaddleView, balls: &[BallView]) -> PaddleAction {
        let target = balls.iter().min_by(|a, b| {
            let da = (a.pos.y - paddle.center.y).abs();
            let db = (b.pos.y - paddle.center.y).abs();
            da.total_cmp(&db)
        });

        let Some(target) = target else {
            return PaddleAction::Stay;
        };

        let dx = target.pos.x - paddle.center.x;
        if dx.abs() <= self.dead_zone {
            PaddleAction::Stay
        } else if dx < 0.0 {
            PaddleAction::MoveLeft
        } else {
            PaddleAction::MoveRight
        }
    }

    fn name(&self) -> &'static str {
        "heuristic"
    }
}

/// Never moves; for a side driven purely by external input
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl PaddlePolicy for IdlePolicy {
    fn decide(&mut self, _paddle: &PaddleView, _balls: &[BallView]) -> PaddleAction {
        PaddleAction::Stay
    }

    fn name(&self) -> &'static str {
        "idle"
    }
}
