//! Collision detection and response
//!
//! Everything is rectangle overlap plus a simplified reflection model. Balls
//! are resolved one at a time against, in order: the vertical exits, the
//! paddles, the first live brick they overlap, then the side walls. Removal is
//! mark-then-compact: lost balls and zero-hit bricks stay in their vectors
//! until [`compact`] runs at the end of the tick.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::effects::EffectTargets;
use super::rect::Rect;
use super::state::{
    Ball, Brick, BrickKind, GameEvent, GameState, Paddle, PowerUp, PowerUpKind, Side, SideStats,
    Sides,
};
use crate::tuning::Tuning;

/// English applied by the paddle: full offset gives `1.5 × base_speed`
const PADDLE_ENGLISH: f32 = 1.5;

/// Which vertical exit, if any, the ball has crossed. The side returned is
/// the side that lost the ball.
pub fn exited_side(ball: &Ball, field_height: f32) -> Option<Side> {
    let rect = ball.rect();
    if rect.top() <= 0.0 {
        Some(Side::Opponent)
    } else if rect.bottom() >= field_height {
        Some(Side::Player)
    } else {
        None
    }
}

/// Bounce a ball off `paddle` if they overlap and the ball is heading into it.
/// Returns true on contact.
pub fn ball_paddle_collision(ball: &mut Ball, paddle: &Paddle, tuning: &Tuning) -> bool {
    let rect = paddle.rect();
    if !ball.rect().intersects(&rect) {
        return false;
    }

    match paddle.owner {
        Side::Player if ball.vel.y > 0.0 => {
            ball.vel.y = -ball.vel.y.abs();
            ball.pos.y = rect.top() - ball.radius;
        }
        Side::Opponent if ball.vel.y < 0.0 => {
            ball.vel.y = ball.vel.y.abs();
            ball.pos.y = rect.bottom() + ball.radius;
        }
        _ => return false,
    }

    let half_width = paddle.width / 2.0;
    let offset = (ball.pos.x - paddle.center_x()) / half_width;
    ball.vel.x = tuning.base_ball_speed * offset * PADDLE_ENGLISH;
    ball.clamp_speed(tuning.max_ball_speed());
    ball.last_hit_by = paddle.owner;
    true
}

/// Reflect `ball` off `brick`, choosing the axis from where the ball was
/// before this tick's move, and push it flush against the struck face.
pub fn reflect_off_brick(ball: &mut Ball, brick: &Rect) {
    let prev = ball.prev_rect();
    if prev.separated_horizontally(brick) {
        if prev.center().x < brick.center().x {
            ball.vel.x = -ball.vel.x.abs();
            ball.pos.x = brick.left() - ball.radius;
        } else {
            ball.vel.x = ball.vel.x.abs();
            ball.pos.x = brick.right() + ball.radius;
        }
    } else if prev.center().y < brick.center().y {
        ball.vel.y = -ball.vel.y.abs();
        ball.pos.y = brick.top() - ball.radius;
    } else {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = brick.bottom() + ball.radius;
    }
}

/// Live points for breaking one brick at `level`
#[inline]
pub fn live_points(tuning: &Tuning, level: u32) -> u64 {
    tuning.brick_points * (level as u64 + 1)
}

/// Credit a destroyed brick to `by`
fn credit_brick(
    stats: &mut Sides<SideStats>,
    events: &mut Vec<GameEvent>,
    by: Side,
    kind: BrickKind,
    points: u64,
) {
    stats[by].bricks.record(kind);
    stats[by].points += points;
    events.push(GameEvent::BrickDestroyed { by, kind, points });
}

/// Resolve every active ball against exits, paddles, bricks and walls
pub fn resolve_balls(state: &mut GameState) {
    let GameState {
        tuning,
        rng,
        level,
        paddles,
        balls,
        bricks,
        power_ups,
        stats,
        events,
        ids,
        ..
    } = state;

    for ball in balls.iter_mut().filter(|b| !b.lost) {
        if let Some(loser) = exited_side(ball, tuning.field_height) {
            ball.lost = true;
            stats[loser].balls_lost += 1;
            events.push(GameEvent::BallLost { side: loser });
            log::debug!(
                "{} lost a ball ({} this round)",
                loser.as_str(),
                stats[loser].balls_lost
            );
            continue;
        }

        for side in Side::ALL {
            if ball_paddle_collision(ball, &paddles[side], tuning) {
                events.push(GameEvent::PaddleHit { side });
                break;
            }
        }

        let ball_rect = ball.rect();
        if let Some(brick) = bricks
            .iter_mut()
            .find(|b| !b.is_destroyed() && b.rect.intersects(&ball_rect))
        {
            reflect_off_brick(ball, &brick.rect);
            let by = ball.last_hit_by;
            events.push(GameEvent::BrickHit { by, kind: brick.kind });

            if brick.hit() {
                credit_brick(stats, events, by, brick.kind, live_points(tuning, *level));
                if rng.random_bool(tuning.power_up_chance) {
                    let id = ids.next_id();
                    let power_up = spawn_power_up(rng, id, brick, by.opposite(), tuning);
                    events.push(GameEvent::PowerUpSpawned {
                        kind: power_up.kind,
                        toward: power_up.toward,
                    });
                    power_ups.push(power_up);
                }
            }
        }

        if ball.bounce_off_walls(rng, tuning) {
            events.push(GameEvent::WallHit);
        }
    }
}

/// Random power-up dropped from a destroyed brick's center
fn spawn_power_up(
    rng: &mut impl Rng,
    id: u32,
    brick: &Brick,
    toward: Side,
    tuning: &Tuning,
) -> PowerUp {
    let kind = *PowerUpKind::ALL
        .choose(rng)
        .unwrap_or(&PowerUpKind::Score);
    PowerUp::new(id, kind, brick.rect.center(), toward, tuning.power_up_size)
}

/// Move power-ups, hand them to whichever paddle they touch and apply the
/// effect immediately. Capsules leaving the field are dropped.
pub fn update_power_ups(state: &mut GameState) {
    let GameState {
        tuning,
        level,
        paddles,
        balls,
        bricks,
        power_ups,
        stats,
        events,
        ids,
        ..
    } = state;

    for power_up in power_ups.iter_mut().filter(|p| !p.consumed) {
        power_up.update(tuning.power_up_speed);

        // The side the capsule is heading for gets the first chance at it
        let toward = power_up.toward;
        let collector = [toward, toward.opposite()]
            .into_iter()
            .find(|&side| power_up.rect.intersects(&paddles[side].rect()));

        if let Some(collector) = collector {
            power_up.consumed = true;
            events.push(GameEvent::PowerUpCollected {
                kind: power_up.kind,
                by: collector,
            });

            let mut targets = EffectTargets {
                paddles: &mut *paddles,
                balls: &mut *balls,
                bricks: &mut bricks[..],
                ids: &mut *ids,
                tuning: &*tuning,
            };
            let effect = power_up.apply(collector, &mut targets);
            stats[collector].total_score += effect.score_bonus;
            for kind in effect.destroyed {
                credit_brick(stats, events, collector, kind, live_points(tuning, *level));
            }
        } else if power_up.off_field(tuning.field_height) {
            power_up.consumed = true;
        }
    }
}

/// Drop lost balls, destroyed bricks and consumed power-ups
pub fn compact(state: &mut GameState) {
    state.balls.retain(|b| !b.lost);
    state.bricks.retain(|b| !b.is_destroyed());
    state.power_ups.retain(|p| !p.consumed);
}
