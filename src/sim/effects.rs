//! Power-up effects
//!
//! Applied once, synchronously, when a paddle collects a capsule.

use super::state::{Ball, Brick, BrickKind, EntityIds, Paddle, PowerUp, PowerUpKind, Side, Sides};
use crate::tuning::Tuning;

/// Ball speed multiplier for `speed`
pub const SPEED_FACTOR: f32 = 1.1;
/// Ball speed multiplier for `slow`
pub const SLOW_FACTOR: f32 = 0.7;
/// Paddle width multiplier for `size`
pub const SIZE_FACTOR: f32 = 1.2;

/// Everything a power-up is allowed to touch
pub struct EffectTargets<'a> {
    pub paddles: &'a mut Sides<Paddle>,
    pub balls: &'a mut Vec<Ball>,
    pub bricks: &'a mut [Brick],
    pub ids: &'a mut EntityIds,
    pub tuning: &'a Tuning,
}

/// Result of applying a power-up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedEffect {
    /// Bonus credited to the collector's total score
    pub score_bonus: u64,
    /// Kinds of bricks destroyed (laser), attributed to the collector
    pub destroyed: Vec<BrickKind>,
}

impl PowerUp {
    pub fn apply(&self, collector: Side, targets: &mut EffectTargets<'_>) -> AppliedEffect {
        apply_kind(self.kind, collector, targets)
    }
}

/// Apply a power-up of `kind` collected by `collector`
pub fn apply_kind(kind: PowerUpKind, collector: Side, targets: &mut EffectTargets<'_>) -> AppliedEffect {
    let tuning = targets.tuning;
    let mut effect = AppliedEffect::default();

    match kind {
        PowerUpKind::Speed => {
            for ball in targets.balls.iter_mut() {
                ball.scale_speed(SPEED_FACTOR, tuning.max_ball_speed());
            }
        }
        PowerUpKind::Slow => {
            for ball in targets.balls.iter_mut() {
                ball.scale_speed(SLOW_FACTOR, tuning.max_ball_speed());
            }
        }
        PowerUpKind::Size => {
            targets.paddles[collector].widen(SIZE_FACTOR, tuning.field_width);
        }
        PowerUpKind::Multi => {
            let active = targets.balls.iter().filter(|b| !b.lost).count();
            if active < tuning.max_balls {
                if let Some(source) = targets.balls.iter().find(|b| !b.lost) {
                    let mut clone = source.clone();
                    clone.id = targets.ids.next_id();
                    clone.trail.clear();
                    // Send it away from the collector
                    clone.vel.y = match collector {
                        Side::Player => -source.vel.y.abs(),
                        Side::Opponent => source.vel.y.abs(),
                    };
                    targets.balls.push(clone);
                }
            }
        }
        PowerUpKind::Score => {
            effect.score_bonus = tuning.score_bonus;
        }
        PowerUpKind::Laser => {
            let beam_x = targets.paddles[collector].center_x();
            for brick in targets.bricks.iter_mut() {
                let in_beam = (brick.rect.center().x - beam_x).abs() <= tuning.laser_half_width;
                if in_beam && brick.destroy() {
                    effect.destroyed.push(brick.kind);
                }
            }
        }
    }

    log::debug!(
        "{} collected {:?} (bonus {}, {} bricks lasered)",
        collector.as_str(),
        kind,
        effect.score_bonus,
        effect.destroyed.len()
    );
    effect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use glam::Vec2;

    struct Fixture {
        tuning: Tuning,
        paddles: Sides<Paddle>,
        balls: Vec<Ball>,
        bricks: Vec<Brick>,
        ids: EntityIds,
    }

    impl Fixture {
        fn new() -> Self {
            let tuning = Tuning::default();
            let paddles = Sides::new(
                Paddle::centered(Side::Player, tuning.player_paddle_y(), &tuning),
                Paddle::centered(Side::Opponent, tuning.opponent_paddle_y, &tuning),
            );
            let mut ids = EntityIds::default();
            let balls = vec![Ball::new(
                ids.next_id(),
                Vec2::new(300.0, 400.0),
                Vec2::new(4.0, 5.0),
                10.0,
                Side::Player,
            )];
            Self {
                tuning,
                paddles,
                balls,
                bricks: Vec::new(),
                ids,
            }
        }

        fn apply(&mut self, kind: PowerUpKind, collector: Side) -> AppliedEffect {
            let mut targets = EffectTargets {
                paddles: &mut self.paddles,
                balls: &mut self.balls,
                bricks: &mut self.bricks,
                ids: &mut self.ids,
                tuning: &self.tuning,
            };
            apply_kind(kind, collector, &mut targets)
        }
    }

    #[test]
    fn test_speed_and_slow() {
        let mut f = Fixture::new();
        f.apply(PowerUpKind::Speed, Side::Player);
        assert!((f.balls[0].vel.x - 4.4).abs() < 1e-4);
        assert!((f.balls[0].vel.y - 5.5).abs() < 1e-4);
        f.apply(PowerUpKind::Slow, Side::Opponent);
        assert!((f.balls[0].vel.x - 3.08).abs() < 1e-4);
        assert!((f.balls[0].vel.y - 3.85).abs() < 1e-4);
    }

    #[test]
    fn test_size_only_widens_collector() {
        let mut f = Fixture::new();
        f.apply(PowerUpKind::Size, Side::Opponent);
        assert!((f.paddles.opponent.width - 120.0).abs() < 1e-4);
        assert_eq!(f.paddles.player.width, 100.0);
    }

    #[test]
    fn test_multi_sends_clone_away_from_collector() {
        let mut f = Fixture::new();
        let effect = f.apply(PowerUpKind::Multi, Side::Player);
        assert_eq!(effect, AppliedEffect::default());
        assert_eq!(f.balls.len(), 2);
        assert!(f.balls[1].vel.y < 0.0);
        assert_ne!(f.balls[0].id, f.balls[1].id);

        f.apply(PowerUpKind::Multi, Side::Opponent);
        assert!(f.balls[2].vel.y > 0.0);
    }

    #[test]
    fn test_multi_respects_cap() {
        let mut f = Fixture::new();
        for _ in 0..20 {
            f.apply(PowerUpKind::Multi, Side::Player);
        }
        assert_eq!(f.balls.len(), f.tuning.max_balls);
    }

    #[test]
    fn test_score_bonus() {
        let mut f = Fixture::new();
        assert_eq!(f.apply(PowerUpKind::Score, Side::Player).score_bonus, 20);
    }

    #[test]
    fn test_laser_hits_beam_column_only() {
        let mut f = Fixture::new();
        let beam_x = f.paddles.opponent.center_x();
        f.bricks = vec![
            Brick::new(10, BrickKind::Hard, Rect::from_center(Vec2::new(beam_x, 300.0), 70.0, 25.0), 0),
            Brick::new(11, BrickKind::Permanent, Rect::from_center(Vec2::new(beam_x + 25.0, 500.0), 70.0, 25.0), 0),
            Brick::new(12, BrickKind::Normal, Rect::from_center(Vec2::new(beam_x + 80.0, 300.0), 70.0, 25.0), 0),
        ];
        let effect = f.apply(PowerUpKind::Laser, Side::Opponent);
        assert_eq!(effect.destroyed, vec![BrickKind::Hard, BrickKind::Permanent]);
        assert!(f.bricks[0].is_destroyed());
        assert!(f.bricks[1].is_destroyed());
        assert!(!f.bricks[2].is_destroyed());
    }
}
