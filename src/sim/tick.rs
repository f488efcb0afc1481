//! Fixed timestep simulation tick
//!
//! Core game loop that advances the match deterministically, plus the round
//! lifecycle (start, summary, game over).

use super::collision::{compact, resolve_balls, update_power_ups};
use super::level;
use super::scoring::{RoundSummary, settle_round};
use super::state::{GameEvent, GamePhase, GameState, Side, Sides};
use crate::policy::PaddleAction;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intended paddle movement per side
    pub actions: Sides<PaddleAction>,
    /// Pause toggle
    pub pause: bool,
    /// Leave the round summary early
    pub continue_round: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => state.phase = GamePhase::Playing,
            _ => {}
        }
    }

    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::RoundSummary => {
            advance_clock(state);
            let shown_ms = state
                .summary_started_ms
                .map_or(0.0, |started| state.clock_ms - started);
            if input.continue_round || shown_ms >= state.tuning.summary_timeout_ms {
                start_round(state);
            }
            return;
        }
        GamePhase::Playing => {}
    }

    advance_clock(state);

    // Paddles
    let field_width = state.tuning.field_width;
    let speeds = Sides::new(
        state.tuning.player_paddle_speed,
        state.tuning.opponent_paddle_speed,
    );
    for side in Side::ALL {
        let dx = input.actions[side].direction() * speeds[side];
        if dx != 0.0 {
            state.paddles[side].move_by(dx, field_width);
        }
    }

    // Movement
    for ball in state.balls.iter_mut() {
        if ball.update(&mut state.rng, &state.tuning) {
            state.events.push(GameEvent::WallHit);
        }
    }
    for brick in state.bricks.iter_mut() {
        brick.update(field_width);
    }

    // Collisions and power-ups, then drop everything marked for removal
    resolve_balls(state);
    update_power_ups(state);
    compact(state);

    multiply_balls(state);
    check_round_end(state);

    state.normalize_order();
}

fn advance_clock(state: &mut GameState) {
    state.time_ticks += 1;
    state.clock_ms += state.tuning.tick_ms;
}

/// Every multiplication interval each ball spawns a twin with mirrored
/// horizontal velocity, up to the ball cap
fn multiply_balls(state: &mut GameState) {
    if state.clock_ms - state.last_multiply_ms < state.tuning.ball_multiply_interval_ms {
        return;
    }
    state.last_multiply_ms = state.clock_ms;

    let cap = state.tuning.max_balls;
    let originals = state.balls.len();
    for i in 0..originals {
        if state.balls.len() >= cap {
            break;
        }
        let mut twin = state.balls[i].clone();
        twin.id = state.ids.next_id();
        twin.vel.x = -twin.vel.x;
        twin.trail.clear();
        state.balls.push(twin);
    }

    let added = state.balls.len() - originals;
    if added > 0 {
        state.events.push(GameEvent::BallsMultiplied { count: added });
        log::debug!("Balls multiplied: {} -> {}", originals, state.balls.len());
    }
}

/// Evaluate terminal and progression conditions, in order
fn check_round_end(state: &mut GameState) {
    let mut summary_due = false;
    let mut level_cleared = false;

    if state.balls.is_empty() {
        summary_due = true;
    } else {
        let threshold = state.tuning.advance_threshold * state.breakable_at_start as f32;
        if state.advance_deadline_ms.is_none() && state.breakable_count() as f32 <= threshold {
            let deadline_ms = state.clock_ms + state.tuning.advance_countdown_ms;
            state.advance_deadline_ms = Some(deadline_ms);
            state.events.push(GameEvent::LevelAdvancing { deadline_ms });
            log::info!(
                "Level {} nearly cleared ({} of {} left), advancing in {:.0}s",
                state.level,
                state.breakable_count(),
                state.breakable_at_start,
                state.tuning.advance_countdown_ms / 1000.0
            );
        }
        if state
            .advance_deadline_ms
            .is_some_and(|deadline| state.clock_ms >= deadline)
        {
            summary_due = true;
            level_cleared = true;
        }
    }

    // Player is checked first, so the opponent wins if both run out together
    let loser = Side::ALL
        .into_iter()
        .find(|&side| state.stats[side].balls_lost >= state.tuning.max_balls_lost);

    if summary_due || loser.is_some() {
        end_round(state, level_cleared);
    }

    if let Some(loser) = loser {
        let winner = loser.opposite();
        state.phase = GamePhase::GameOver;
        state.winner = Some(winner);
        state.events.push(GameEvent::GameOver { winner });
        log::info!(
            "Game over after round {}: {} lost {} balls, {} wins ({} - {})",
            state.round,
            loser.as_str(),
            state.stats[loser].balls_lost,
            winner.as_str(),
            state.stats.player.total_score,
            state.stats.opponent.total_score
        );
    }
}

/// Score the current round and enter the summary phase
pub fn end_round(state: &mut GameState, level_cleared: bool) -> RoundSummary {
    let summary = settle_round(&mut state.stats, state.round, state.level, level_cleared);
    if level_cleared {
        state.level += 1;
    }

    state.phase = GamePhase::RoundSummary;
    state.summary_started_ms = Some(state.clock_ms);
    state.advance_deadline_ms = None;
    state.last_summary = Some(summary.clone());
    state.events.push(GameEvent::RoundEnded(summary.clone()));

    log::info!(
        "Round {} over: player {} - opponent {} ({})",
        summary.round,
        summary.scores.player,
        summary.scores.opponent,
        summary.winner.map_or("tie", |w| w.as_str())
    );
    summary
}

/// Reset the field for a new round at the current level
pub fn start_round(state: &mut GameState) {
    state.round += 1;
    state.phase = GamePhase::Playing;

    state.power_ups.clear();
    state.balls.clear();
    let field_width = state.tuning.field_width;
    for side in Side::ALL {
        state.paddles[side].reset_width(field_width);
        state.stats[side].reset_round();
    }

    state.spawn_serve_ball(Side::Player);
    state.spawn_serve_ball(Side::Opponent);

    state.bricks = level::generate(state.level, &state.tuning, &mut state.rng, &mut state.ids);
    state.breakable_at_start = state.breakable_count();

    state.advance_deadline_ms = None;
    state.summary_started_ms = None;
    state.last_multiply_ms = state.clock_ms;

    state.events.push(GameEvent::RoundStarted {
        round: state.round,
        level: state.level,
    });
    log::info!(
        "Round {} started at level {}: {} bricks ({} breakable)",
        state.round,
        state.level,
        state.bricks.len(),
        state.breakable_at_start
    );
}
