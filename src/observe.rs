//! Observation vectors for external agents
//!
//! Flat `f32` vectors in field pixels, fixed length for a given
//! [`ObservationConfig`]. Entity slots beyond what is on the field are
//! zero-padded (type slots use -1).

use serde::{Deserialize, Serialize};

use crate::sim::{GameState, Side};

/// Number of ball, brick and power-up slots in an observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationConfig {
    pub max_balls: usize,
    pub max_bricks: usize,
    pub max_power_ups: usize,
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            max_balls: 6,
            max_bricks: 20,
            max_power_ups: 3,
        }
    }
}

const PADDLE_FEATURES: usize = 6;
const BALL_FEATURES: usize = 6;
const NEAREST_FEATURES: usize = 2;
const COUNT_FEATURES: usize = 2;
const BRICK_FEATURES: usize = 3;
const POWER_UP_FEATURES: usize = 3;

/// Padding for an empty brick or power-up type slot
const EMPTY_KIND: f32 = -1.0;

impl ObservationConfig {
    /// Length of every vector produced by [`observe`]
    pub fn observation_len(&self) -> usize {
        PADDLE_FEATURES
            + BALL_FEATURES * self.max_balls
            + NEAREST_FEATURES
            + COUNT_FEATURES
            + BRICK_FEATURES * self.max_bricks
            + POWER_UP_FEATURES * self.max_power_ups
    }
}

/// Observation from `side`'s point of view.
///
/// Layout: own paddle cx, other paddle cx, own left/right, other left/right;
/// per ball (cx, cy, vx, vy, distance to own paddle center, distance to the
/// nearest brick center); offset (dx, dy) to the Manhattan-nearest ball; ball
/// count, brick count; per brick (cx, cy, type code); per power-up (cx, cy,
/// kind code).
pub fn observe(state: &GameState, side: Side, config: &ObservationConfig) -> Vec<f32> {
    let mut obs = Vec::with_capacity(config.observation_len());
    let own = &state.paddles[side];
    let other = &state.paddles[side.opposite()];
    let own_center = own.center();

    obs.extend([
        own.center_x(),
        other.center_x(),
        own.rect().left(),
        own.rect().right(),
        other.rect().left(),
        other.rect().right(),
    ]);

    for slot in 0..config.max_balls {
        match state.balls.get(slot) {
            Some(ball) => {
                let to_brick = state
                    .bricks
                    .iter()
                    .map(|b| ball.pos.distance(b.rect.center()))
                    .min_by(f32::total_cmp)
                    .unwrap_or(0.0);
                obs.extend([
                    ball.pos.x,
                    ball.pos.y,
                    ball.vel.x,
                    ball.vel.y,
                    ball.pos.distance(own_center),
                    to_brick,
                ]);
            }
            None => obs.extend([0.0; BALL_FEATURES]),
        }
    }

    let nearest = state
        .balls
        .iter()
        .map(|b| b.pos - own_center)
        .min_by(|a, b| (a.x.abs() + a.y.abs()).total_cmp(&(b.x.abs() + b.y.abs())))
        .unwrap_or_default();
    obs.extend([nearest.x, nearest.y]);

    obs.extend([state.balls.len() as f32, state.bricks.len() as f32]);

    for slot in 0..config.max_bricks {
        match state.bricks.get(slot) {
            Some(brick) => {
                let c = brick.rect.center();
                obs.extend([c.x, c.y, brick.kind.code()]);
            }
            None => obs.extend([0.0, 0.0, EMPTY_KIND]),
        }
    }

    for slot in 0..config.max_power_ups {
        match state.power_ups.get(slot) {
            Some(power_up) => {
                let c = power_up.rect.center();
                obs.extend([c.x, c.y, power_up.kind.code()]);
            }
            None => obs.extend([0.0, 0.0, EMPTY_KIND]),
        }
    }

    debug_assert_eq!(obs.len(), config.observation_len());
    obs
}
