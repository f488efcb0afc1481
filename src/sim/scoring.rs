//! Round scoring
//!
//! A round is scored from the bricks each side broke minus a decaying
//! penalty for the balls it lost. Scores never go below zero.

use serde::{Deserialize, Serialize};

use super::state::{BrickKind, BrickTally, Side, SideStats, Sides};

/// Largest total penalty for lost balls in one round
pub const MAX_BALL_PENALTY: u32 = 15;
/// Penalty for the first lost ball; each later ball costs one less
const FIRST_BALL_PENALTY: u32 = 5;

/// Outcome of a finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub level: u32,
    pub scores: Sides<u32>,
    /// `None` on a tie
    pub winner: Option<Side>,
    /// The round ended because the level was (nearly) cleared
    pub level_cleared: bool,
}

/// Penalty for `losses` lost balls: 5 + 4 + 3 + 2 + 1, capped at 15
pub fn ball_loss_penalty(losses: u32) -> u32 {
    let raw: u32 = (1..=losses.min(FIRST_BALL_PENALTY + 1))
        .map(|i| (FIRST_BALL_PENALTY + 1).saturating_sub(i))
        .sum();
    raw.min(MAX_BALL_PENALTY)
}

/// Summary value of the bricks in `tally`
pub fn brick_points(tally: &BrickTally) -> u32 {
    BrickKind::ALL
        .iter()
        .map(|&kind| tally[kind] * kind.point_value())
        .sum()
}

/// Round score for one side, floored at zero
pub fn round_score(stats: &SideStats) -> u32 {
    brick_points(&stats.bricks).saturating_sub(ball_loss_penalty(stats.balls_lost))
}

/// Strictly higher score wins
pub fn round_winner(scores: &Sides<u32>) -> Option<Side> {
    use std::cmp::Ordering;
    match scores.player.cmp(&scores.opponent) {
        Ordering::Greater => Some(Side::Player),
        Ordering::Less => Some(Side::Opponent),
        Ordering::Equal => None,
    }
}

/// Score the round, store round scores and fold them into the match totals
pub fn settle_round(
    stats: &mut Sides<SideStats>,
    round: u32,
    level: u32,
    level_cleared: bool,
) -> RoundSummary {
    let scores = Sides::new(round_score(&stats.player), round_score(&stats.opponent));
    for side in Side::ALL {
        let side_stats = &mut stats[side];
        side_stats.round_score = scores[side];
        side_stats.total_score += scores[side] as u64;
    }

    RoundSummary {
        round,
        level,
        winner: round_winner(&scores),
        scores,
        level_cleared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ball_loss_penalty_table() {
        let expected = [0, 5, 9, 12, 14, 15, 15, 15];
        for (n, &want) in expected.iter().enumerate() {
            assert_eq!(ball_loss_penalty(n as u32), want, "losses = {n}");
        }
        assert_eq!(ball_loss_penalty(u32::MAX), 15);
    }

    #[test]
    fn test_brick_points() {
        let tally = BrickTally {
            normal: 2,
            hard: 1,
            permanent: 1,
            boss: 1,
            moving: 1,
        };
        assert_eq!(brick_points(&tally), 2 + 3 + 5 + 10 + 3);
    }

    #[test]
    fn test_round_score_floors_at_zero() {
        let stats = SideStats {
            bricks: BrickTally {
                normal: 3,
                ..Default::default()
            },
            balls_lost: 2,
            ..Default::default()
        };
        assert_eq!(round_score(&stats), 0);
    }

    #[test]
    fn test_settle_round_accumulates() {
        let mut stats = Sides::<SideStats>::default();
        stats.player.bricks.hard = 4; // 12
        stats.player.balls_lost = 1; // -5
        stats.opponent.bricks.normal = 7; // 7
        stats.opponent.total_score = 10;

        let summary = settle_round(&mut stats, 3, 2, false);
        assert_eq!(summary.scores, Sides::new(7, 7));
        assert_eq!(summary.winner, None);
        assert_eq!(stats.player.total_score, 7);
        assert_eq!(stats.opponent.total_score, 17);

        stats.player.bricks.boss = 1;
        let summary = settle_round(&mut stats, 4, 2, true);
        assert_eq!(summary.winner, Some(Side::Player));
        assert!(summary.level_cleared);
    }
}
