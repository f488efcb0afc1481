//! Read-only per-tick view for renderers
//!
//! Everything a frontend needs to draw one frame, detached from the
//! simulation so it can be serialized or sent across a thread.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{
    BrickKind, GamePhase, GameState, PowerUpKind, Rect, RoundSummary, SideStats, Sides,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallFrame {
    pub rect: Rect,
    /// Oldest first
    pub trail: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickFrame {
    pub rect: Rect,
    pub kind: BrickKind,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpFrame {
    pub rect: Rect,
    pub kind: PowerUpKind,
    pub pulse: f32,
}

/// One frame of the match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub round: u32,
    pub level: u32,
    pub paddles: Sides<Rect>,
    pub balls: Vec<BallFrame>,
    pub bricks: Vec<BrickFrame>,
    pub power_ups: Vec<PowerUpFrame>,
    pub stats: Sides<SideStats>,
    /// Seconds left before the level advances, while counting down
    pub advance_in_secs: Option<f64>,
    pub last_summary: Option<RoundSummary>,
}

impl GameState {
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.time_ticks,
            phase: self.phase,
            round: self.round,
            level: self.level,
            paddles: Sides::new(self.paddles.player.rect(), self.paddles.opponent.rect()),
            balls: self
                .balls
                .iter()
                .map(|b| BallFrame {
                    rect: b.rect(),
                    trail: b.trail.iter().copied().collect(),
                })
                .collect(),
            bricks: self
                .bricks
                .iter()
                .map(|b| BrickFrame {
                    rect: b.rect,
                    kind: b.kind,
                    color: b.color,
                })
                .collect(),
            power_ups: self
                .power_ups
                .iter()
                .map(|p| PowerUpFrame {
                    rect: p.rect,
                    kind: p.kind,
                    pulse: p.pulse,
                })
                .collect(),
            stats: self.stats.clone(),
            advance_in_secs: self
                .advance_deadline_ms
                .map(|deadline| ((deadline - self.clock_ms) / 1000.0).max(0.0)),
            last_summary: self.last_summary.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::sim::{GameState, TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(Tuning::default(), 31);
        for _ in 0..3 {
            tick(&mut state, &TickInput::default());
        }
        let frame = state.snapshot();
        assert_eq!(frame.tick, 3);
        assert_eq!(frame.balls.len(), state.balls.len());
        assert_eq!(frame.balls[0].trail.len(), 3);
        assert_eq!(frame.bricks.len(), state.bricks.len());
        assert_eq!(frame.paddles.player, state.paddles.player.rect());
        assert_eq!(frame.advance_in_secs, None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(Tuning::default(), 31);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        let back: super::FrameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bricks.len(), state.bricks.len());
    }
}
