//! Match driver
//!
//! Pairs a [`GameState`] with one policy per side. Each call to
//! [`Match::step`] asks the policies for actions (unless the caller
//! overrides a side) and runs exactly one simulation tick.

use crate::policy::{HeuristicPolicy, IdlePolicy, PaddleAction, PaddlePolicy, views};
use crate::sim::{GameState, Side, Sides, TickInput, tick};
use crate::tuning::Tuning;

/// External input for one step
#[derive(Debug, Clone, Default)]
pub struct MatchInput {
    /// Overrides the side's policy when set
    pub actions: Sides<Option<PaddleAction>>,
    pub pause: bool,
    pub continue_round: bool,
}

impl MatchInput {
    /// Drive only the player paddle
    pub fn player(action: PaddleAction) -> Self {
        Self {
            actions: Sides::new(Some(action), None),
            ..Default::default()
        }
    }
}

/// A running match
pub struct Match {
    pub state: GameState,
    policies: Sides<Box<dyn PaddlePolicy>>,
}

impl Match {
    pub fn new(state: GameState, player: Box<dyn PaddlePolicy>, opponent: Box<dyn PaddlePolicy>) -> Self {
        log::info!(
            "Match seed {}: player={}, opponent={}",
            state.seed,
            player.name(),
            opponent.name()
        );
        Self {
            state,
            policies: Sides::new(player, opponent),
        }
    }

    /// Human/agent player against the heuristic opponent
    pub fn against_heuristic(tuning: Tuning, seed: u64) -> Self {
        Self::new(
            GameState::new(tuning, seed),
            Box::new(IdlePolicy),
            Box::new(HeuristicPolicy::default()),
        )
    }

    /// Heuristic on both sides
    pub fn demo(tuning: Tuning, seed: u64) -> Self {
        Self::new(
            GameState::new(tuning, seed),
            Box::new(HeuristicPolicy::default()),
            Box::new(HeuristicPolicy::default()),
        )
    }

    pub fn policy_name(&self, side: Side) -> &'static str {
        self.policies[side].name()
    }

    /// Actions the policies would take right now
    fn decide(&mut self) -> Sides<PaddleAction> {
        let mut actions = Sides::<PaddleAction>::default();
        for side in Side::ALL {
            let (paddle, balls) = views(&self.state, side);
            actions[side] = self.policies[side].decide(&paddle, &balls);
        }
        actions
    }

    /// Run one tick
    pub fn step(&mut self, input: &MatchInput) {
        let decided = self.decide();
        let mut actions = Sides::<PaddleAction>::default();
        for side in Side::ALL {
            actions[side] = input.actions[side].unwrap_or(decided[side]);
        }

        let tick_input = TickInput {
            actions,
            pause: input.pause,
            continue_round: input.continue_round,
        };
        tick(&mut self.state, &tick_input);
    }

    /// Run until `max_ticks` or game over. Returns ticks run.
    pub fn run(&mut self, max_ticks: u64) -> u64 {
        let input = MatchInput::default();
        let mut ticks = 0;
        while ticks < max_ticks && self.state.winner.is_none() {
            self.step(&input);
            ticks += 1;
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    #[test]
    fn test_override_beats_policy() {
        let mut game = Match::against_heuristic(Tuning::default(), 3);
        let x = game.state.paddles.player.x;
        game.step(&MatchInput::player(PaddleAction::MoveLeft));
        assert_eq!(game.state.paddles.player.x, x - 20.0);
        assert_eq!(game.policy_name(Side::Player), "idle");
        assert_eq!(game.policy_name(Side::Opponent), "heuristic");
    }

    #[test]
    fn test_opponent_policy_moves_paddle() {
        let mut game = Match::against_heuristic(Tuning::default(), 3);
        let start = game.state.paddles.opponent.x;
        for _ in 0..30 {
            game.step(&MatchInput::default());
        }
        // Serve balls start off-center horizontally once they travel
        assert_ne!(game.state.paddles.opponent.x, start);
        assert_eq!(game.state.paddles.player.x, (1200.0 - 100.0) / 2.0);
    }

    #[test]
    fn test_demo_runs_to_completion_or_limit() {
        let mut game = Match::demo(Tuning::default(), 77);
        let ticks = game.run(20_000);
        assert!(ticks <= 20_000);
        if game.state.winner.is_some() {
            assert_eq!(game.state.phase, GamePhase::GameOver);
        }
        assert!(game.state.round >= 1);
    }
}
