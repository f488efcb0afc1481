//! Reward shaping for external agents
//!
//! Rewards are computed per side from the tick's events and from how the
//! side's paddle moved.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, GameState, Side};

/// Reward weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    /// Per brick destroyed by the side
    pub brick_break: f32,
    /// Times (n - 1) when the side destroys n > 1 bricks in one tick
    pub multi_break_bonus: f32,
    /// Per ball returned by the side's paddle
    pub paddle_hit: f32,
    /// Per ball lost past the side's baseline
    pub ball_lost: f32,
    /// When the paddle moved this tick
    pub movement_bonus: f32,
    /// When the paddle touches a side wall
    pub wall_hug_penalty: f32,
    /// Per tick once the paddle has been still for `idle_steps` ticks
    pub idle_penalty: f32,
    pub idle_steps: u32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            brick_break: 1.0,
            multi_break_bonus: 0.5,
            paddle_hit: 0.6,
            ball_lost: -10.0,
            movement_bonus: 0.06,
            wall_hug_penalty: -0.01,
            idle_penalty: -0.05,
            idle_steps: 10,
        }
    }
}

/// Stateful per-side reward computation (tracks idle streaks)
#[derive(Debug, Clone)]
pub struct RewardShaper {
    side: Side,
    config: RewardConfig,
    still_ticks: u32,
}

impl RewardShaper {
    pub fn new(side: Side, config: RewardConfig) -> Self {
        Self {
            side,
            config,
            still_ticks: 0,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn reset(&mut self) {
        self.still_ticks = 0;
    }

    /// Reward for the tick that just ran. `paddle_x_before` is the side's
    /// paddle center before the tick.
    pub fn reward(&mut self, state: &GameState, paddle_x_before: f32) -> f32 {
        let cfg = &self.config;
        let side = self.side;
        let mut reward = 0.0;

        let paddle = &state.paddles[side];
        if paddle.center_x() != paddle_x_before {
            reward += cfg.movement_bonus;
            self.still_ticks = 0;
        } else {
            self.still_ticks += 1;
            if self.still_ticks >= cfg.idle_steps {
                reward += cfg.idle_penalty;
            }
        }

        if paddle.at_edge(state.tuning.field_width) {
            reward += cfg.wall_hug_penalty;
        }

        let mut broken = 0u32;
        for event in &state.events {
            match *event {
                GameEvent::BrickDestroyed { by, .. } if by == side => broken += 1,
                GameEvent::PaddleHit { side: s } if s == side => reward += cfg.paddle_hit,
                GameEvent::BallLost { side: s } if s == side => reward += cfg.ball_lost,
                _ => {}
            }
        }
        reward += cfg.brick_break * broken as f32;
        if broken > 1 {
            reward += cfg.multi_break_bonus * (broken - 1) as f32;
        }

        log::trace!("{} reward {:.3} ({} bricks)", side.as_str(), reward, broken);
        reward
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::BrickKind;
    use crate::tuning::Tuning;

    fn state() -> GameState {
        let mut state = GameState::new(Tuning::default(), 9);
        state.events.clear();
        state
    }

    #[test]
    fn test_movement_and_idle() {
        let state = state();
        let mut shaper = RewardShaper::new(Side::Player, RewardConfig::default());
        let x = state.paddles.player.center_x();

        let moved = shaper.reward(&state, x - 20.0);
        assert!((moved - 0.06).abs() < 1e-6);

        for _ in 0..9 {
            assert_eq!(shaper.reward(&state, x), 0.0);
        }
        assert!((shaper.reward(&state, x) + 0.05).abs() < 1e-6);

        shaper.reset();
        assert_eq!(shaper.reward(&state, x), 0.0);
    }

    #[test]
    fn test_wall_hug() {
        let mut state = state();
        state.paddles.player.x = 0.0;
        let mut shaper = RewardShaper::new(Side::Player, RewardConfig::default());
        let x = state.paddles.player.center_x();
        assert!((shaper.reward(&state, x) + 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_event_rewards_are_per_side() {
        let mut state = state();
        state.events = vec![
            GameEvent::BrickDestroyed { by: Side::Player, kind: BrickKind::Normal, points: 10 },
            GameEvent::BrickDestroyed { by: Side::Player, kind: BrickKind::Hard, points: 10 },
            GameEvent::BrickDestroyed { by: Side::Player, kind: BrickKind::Normal, points: 10 },
            GameEvent::BrickDestroyed { by: Side::Opponent, kind: BrickKind::Normal, points: 10 },
            GameEvent::PaddleHit { side: Side::Player },
            GameEvent::BallLost { side: Side::Opponent },
        ];
        let x = state.paddles.player.center_x();

        let mut player = RewardShaper::new(Side::Player, RewardConfig::default());
        // 3 bricks + 2 × 0.5 bonus + paddle hit
        assert!((player.reward(&state, x) - (3.0 + 1.0 + 0.6)).abs() < 1e-5);

        let mut opponent = RewardShaper::new(Side::Opponent, RewardConfig::default());
        let ox = state.paddles.opponent.center_x();
        assert!((opponent.reward(&state, ox) - (1.0 - 10.0)).abs() < 1e-5);
    }
}
