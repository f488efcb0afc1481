//! Step/reset environment for external learners
//!
//! One side (the player by default) is driven by integer action codes; the
//! other side runs [`HeuristicPolicy`]. An episode lasts one round: it
//! terminates when the round or the match ends, when the field is cleared, or
//! when the learner has lost too many balls, and is truncated after
//! `max_episode_ticks`.

use serde::Serialize;

use crate::game::{Match, MatchInput};
use crate::observe::observe;
use crate::policy::{HeuristicPolicy, IdlePolicy, PaddleAction, PaddlePolicy};
use crate::reward::RewardShaper;
use crate::sim::{GamePhase, GameState, RoundSummary, Side, Sides};
use crate::tuning::Tuning;

/// Default episode length cap (about three minutes of play)
pub const DEFAULT_MAX_EPISODE_TICKS: u64 = 10_800;

/// Diagnostics returned with every step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvInfo {
    pub balls_left: usize,
    pub bricks_left: usize,
    /// Balls the learner lost this round
    pub balls_lost: u32,
    /// Match winner, once decided
    pub winner: Option<Side>,
    /// Set on the step that ended a round
    pub summary: Option<RoundSummary>,
}

/// Result of one environment step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvStep {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: EnvInfo,
}

pub struct BrickPongEnv {
    tuning: Tuning,
    side: Side,
    next_seed: u64,
    max_episode_ticks: u64,
    episode_ticks: u64,
    game: Match,
    shaper: RewardShaper,
}

impl BrickPongEnv {
    /// Learner plays the bottom paddle
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        Self::for_side(tuning, seed, Side::Player)
    }

    pub fn for_side(tuning: Tuning, seed: u64, side: Side) -> Self {
        let game = Self::build_match(&tuning, seed, side);
        let shaper = RewardShaper::new(side, tuning.reward.clone());
        Self {
            tuning,
            side,
            next_seed: seed.wrapping_add(1),
            max_episode_ticks: DEFAULT_MAX_EPISODE_TICKS,
            episode_ticks: 0,
            game,
            shaper,
        }
    }

    pub fn with_max_episode_ticks(mut self, max_episode_ticks: u64) -> Self {
        self.max_episode_ticks = max_episode_ticks;
        self
    }

    fn build_match(tuning: &Tuning, seed: u64, side: Side) -> Match {
        let learner: Box<dyn PaddlePolicy> = Box::new(IdlePolicy);
        let heuristic: Box<dyn PaddlePolicy> = Box::new(HeuristicPolicy::default());
        let state = GameState::new(tuning.clone(), seed);
        match side {
            Side::Player => Match::new(state, learner, heuristic),
            Side::Opponent => Match::new(state, heuristic, learner),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn state(&self) -> &GameState {
        &self.game.state
    }

    pub fn observation_len(&self) -> usize {
        self.tuning.observation.observation_len()
    }

    /// Number of discrete actions (stay, left, right)
    pub fn action_count(&self) -> usize {
        3
    }

    fn observation(&self) -> Vec<f32> {
        observe(&self.game.state, self.side, &self.tuning.observation)
    }

    /// Start a fresh match on the next seed and return the first observation
    pub fn reset(&mut self) -> Vec<f32> {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        self.reset_seeded(seed)
    }

    pub fn reset_seeded(&mut self, seed: u64) -> Vec<f32> {
        self.game = Self::build_match(&self.tuning, seed, self.side);
        self.shaper.reset();
        self.episode_ticks = 0;
        self.observation()
    }

    /// Apply one action code (0 = stay, 1 = left, 2 = right) and run a tick
    pub fn step(&mut self, action_code: i64) -> EnvStep {
        let action = PaddleAction::from_code(action_code).unwrap_or_else(|| {
            log::warn!("Invalid action code {}, treating as stay", action_code);
            PaddleAction::Stay
        });

        let x_before = self.game.state.paddles[self.side].center_x();
        let mut actions = Sides::<Option<PaddleAction>>::default();
        actions[self.side] = Some(action);
        self.game.step(&MatchInput {
            actions,
            ..Default::default()
        });
        self.episode_ticks += 1;

        let state = &self.game.state;
        let reward = self.shaper.reward(state, x_before);
        let balls_lost = state.stats[self.side].balls_lost;
        let round_over = matches!(state.phase, GamePhase::RoundSummary | GamePhase::GameOver);
        let terminated = round_over
            || state.balls.is_empty()
            || state.bricks.is_empty()
            || balls_lost >= self.tuning.max_balls_lost;
        let truncated = !terminated && self.episode_ticks >= self.max_episode_ticks;

        let summary = if round_over {
            state.last_summary.clone()
        } else {
            None
        };

        EnvStep {
            observation: self.observation(),
            reward,
            terminated,
            truncated,
            info: EnvInfo {
                balls_left: state.balls.len(),
                bricks_left: state.bricks.len(),
                balls_lost,
                winner: state.winner,
                summary,
            },
        }
    }
}
