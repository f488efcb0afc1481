//! Game state and core simulation types
//!
//! Everything the simulation mutates during a tick lives in `GameState`.

use std::collections::VecDeque;
use std::ops::{Index, IndexMut};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::scoring::RoundSummary;
use crate::tuning::Tuning;

/// One of the two competing sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Bottom paddle, human or external agent
    Player,
    /// Top paddle, automated
    Opponent,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Player, Side::Opponent];

    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Player => "player",
            Side::Opponent => "opponent",
        }
    }
}

/// A value held once per side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sides<T> {
    pub player: T,
    pub opponent: T,
}

impl<T> Sides<T> {
    pub fn new(player: T, opponent: T) -> Self {
        Self { player, opponent }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::Player, &self.player), (Side::Opponent, &self.opponent)].into_iter()
    }
}

impl<T> Index<Side> for Sides<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }
}

impl<T> IndexMut<Side> for Sides<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Round over, scores shown until continue or timeout
    RoundSummary,
    /// Game is paused
    Paused,
    /// A side lost too many balls in one round
    GameOver,
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    /// Center position before the last move (collision axis detection)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub last_hit_by: Side,
    /// Recent positions for rendering (oldest first)
    pub trail: VecDeque<Vec2>,
    /// Marked during collision resolution, compacted at the end of the tick
    #[serde(skip)]
    pub lost: bool,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32, owner: Side) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            vel,
            radius,
            last_hit_by: owner,
            trail: VecDeque::new(),
            lost: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.radius * 2.0, self.radius * 2.0)
    }

    pub fn prev_rect(&self) -> Rect {
        Rect::from_center(self.prev_pos, self.radius * 2.0, self.radius * 2.0)
    }

    /// Advance one tick: move, bounce off side walls, clamp speed, record trail.
    /// Returns true if a side wall was hit.
    pub fn update(&mut self, rng: &mut impl Rng, tuning: &Tuning) -> bool {
        self.prev_pos = self.pos;
        self.pos += self.vel;
        let bounced = self.bounce_off_walls(rng, tuning);
        self.clamp_speed(tuning.max_ball_speed());
        self.record_trail(tuning.trail_length);
        bounced
    }

    /// Reflect off the left/right walls with a small random perturbation.
    ///
    /// Only reflects when moving into the wall, so calling it twice in one
    /// tick has no further effect.
    pub fn bounce_off_walls(&mut self, rng: &mut impl Rng, tuning: &Tuning) -> bool {
        let jitter = tuning.wall_jitter * tuning.base_ball_speed;
        let rect = self.rect();

        if rect.left() <= 0.0 && self.vel.x <= 0.0 {
            self.pos.x = self.radius;
            self.vel.x = (self.vel.x.abs() + rng.random_range(-jitter..=jitter)).abs();
        } else if rect.right() >= tuning.field_width && self.vel.x >= 0.0 {
            self.pos.x = tuning.field_width - self.radius;
            self.vel.x = -(self.vel.x.abs() + rng.random_range(-jitter..=jitter)).abs();
        } else {
            return false;
        }
        self.clamp_speed(tuning.max_ball_speed());
        true
    }

    /// Clamp each velocity component to `±max`
    pub fn clamp_speed(&mut self, max: f32) {
        self.vel = self.vel.clamp(Vec2::splat(-max), Vec2::splat(max));
    }

    pub fn record_trail(&mut self, cap: usize) {
        self.trail.push_back(self.pos);
        while self.trail.len() > cap {
            self.trail.pop_front();
        }
    }

    /// Scale both velocity components
    pub fn scale_speed(&mut self, factor: f32, max: f32) {
        self.vel *= factor;
        self.clamp_speed(max);
    }
}

/// A paddle, owned by one side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub owner: Side,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub base_width: f32,
}

impl Paddle {
    /// Create a paddle horizontally centered in the field
    pub fn centered(owner: Side, y: f32, tuning: &Tuning) -> Self {
        Self {
            owner,
            x: (tuning.field_width - tuning.paddle_width) / 2.0,
            y,
            width: tuning.paddle_width,
            height: tuning.paddle_height,
            base_width: tuning.paddle_width,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Move horizontally, then clamp to the field
    pub fn move_by(&mut self, dx: f32, field_width: f32) {
        self.x += dx;
        self.clamp_to_field(field_width);
    }

    pub fn clamp_to_field(&mut self, field_width: f32) {
        self.x = self.x.clamp(0.0, (field_width - self.width).max(0.0));
        debug_assert!(self.x >= 0.0 && self.x + self.width <= field_width + 1e-3);
    }

    /// Touching either side wall
    pub fn at_edge(&self, field_width: f32) -> bool {
        self.x <= 0.0 || self.x + self.width >= field_width
    }

    /// Grow around the current center, capped at twice the base width
    pub fn widen(&mut self, factor: f32, field_width: f32) {
        let center = self.center_x();
        self.width = (self.width * factor).min(self.base_width * 2.0);
        self.x = center - self.width / 2.0;
        self.clamp_to_field(field_width);
    }

    pub fn reset_width(&mut self, field_width: f32) {
        let center = self.center_x();
        self.width = self.base_width;
        self.x = center - self.width / 2.0;
        self.clamp_to_field(field_width);
    }
}

/// Brick types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrickKind {
    Normal,
    Hard,
    /// Indestructible by balls, excluded from the breakable count
    Permanent,
    Boss,
    /// Slides horizontally, bouncing off the field edges
    Moving,
}

impl BrickKind {
    pub const ALL: [BrickKind; 5] = [
        BrickKind::Normal,
        BrickKind::Hard,
        BrickKind::Permanent,
        BrickKind::Boss,
        BrickKind::Moving,
    ];

    /// Starting hits (-1 = indestructible)
    pub fn initial_hits(self, level: u32) -> i32 {
        match self {
            BrickKind::Normal => 1,
            BrickKind::Hard => 3,
            BrickKind::Permanent => -1,
            BrickKind::Boss => i32::try_from(level.max(1).saturating_mul(2)).unwrap_or(i32::MAX),
            BrickKind::Moving => 2,
        }
    }

    pub fn base_color(self) -> [u8; 3] {
        match self {
            BrickKind::Normal => [0, 0, 255],
            BrickKind::Hard => [255, 0, 0],
            BrickKind::Permanent => [200, 200, 200],
            BrickKind::Boss => [160, 32, 240],
            BrickKind::Moving => [0, 200, 120],
        }
    }

    /// Round-summary value of breaking one brick of this kind
    pub fn point_value(self) -> u32 {
        match self {
            BrickKind::Normal => 1,
            BrickKind::Hard => 3,
            BrickKind::Permanent => 5,
            BrickKind::Boss => 10,
            BrickKind::Moving => 3,
        }
    }

    /// Numeric type code used in observation vectors
    pub fn code(self) -> f32 {
        match self {
            BrickKind::Normal => 1.0,
            BrickKind::Hard => 2.0,
            BrickKind::Permanent => 3.0,
            BrickKind::Boss => 4.0,
            BrickKind::Moving => 5.0,
        }
    }
}

/// Color lost per channel on each non-destroying hit
pub const DAMAGE_DARKEN: u8 = 50;
/// Extra red added to a damaged boss brick
pub const BOSS_RED_SHIFT: u8 = 60;

/// A brick entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub kind: BrickKind,
    pub rect: Rect,
    /// Remaining hits; -1 = indestructible, 0 = destroyed this tick
    pub hits: i32,
    pub color: [u8; 3],
    /// Horizontal velocity (moving bricks only)
    #[serde(default)]
    pub velocity: f32,
}

impl Brick {
    pub fn new(id: u32, kind: BrickKind, rect: Rect, level: u32) -> Self {
        Self {
            id,
            kind,
            rect,
            hits: kind.initial_hits(level),
            color: kind.base_color(),
            velocity: 0.0,
        }
    }

    /// Has hits left to lose
    #[inline]
    pub fn is_breakable(&self) -> bool {
        self.hits > 0
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.hits == 0
    }

    /// Slide moving bricks, reversing flush against either field edge
    pub fn update(&mut self, field_width: f32) {
        if self.kind != BrickKind::Moving || self.velocity == 0.0 {
            return;
        }
        self.rect.x += self.velocity;
        if self.rect.left() <= 0.0 {
            self.rect.x = 0.0;
            self.velocity = self.velocity.abs();
        } else if self.rect.right() >= field_width {
            self.rect.x = field_width - self.rect.w;
            self.velocity = -self.velocity.abs();
        }
    }

    /// Register a ball hit. Returns true exactly when this hit destroys the brick.
    pub fn hit(&mut self) -> bool {
        if self.hits <= 0 {
            return false;
        }
        self.hits -= 1;
        debug_assert!(self.hits >= 0);
        if self.hits == 0 {
            return true;
        }

        self.color = self.color.map(|c| c.saturating_sub(DAMAGE_DARKEN));
        if self.kind == BrickKind::Boss {
            self.color[0] = self.color[0].saturating_add(BOSS_RED_SHIFT);
        }
        false
    }

    /// Remove unconditionally (laser). Returns false if already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.hits == 0 {
            return false;
        }
        self.hits = 0;
        true
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Speed,
    Size,
    Multi,
    Score,
    Laser,
    Slow,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::Speed,
        PowerUpKind::Size,
        PowerUpKind::Multi,
        PowerUpKind::Score,
        PowerUpKind::Laser,
        PowerUpKind::Slow,
    ];

    /// Numeric kind code used in observation vectors
    pub fn code(self) -> f32 {
        match self {
            PowerUpKind::Speed => 0.0,
            PowerUpKind::Size => 1.0,
            PowerUpKind::Multi => 2.0,
            PowerUpKind::Score => 3.0,
            PowerUpKind::Laser => 4.0,
            PowerUpKind::Slow => 5.0,
        }
    }
}

/// A falling (or rising) power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub rect: Rect,
    /// Side whose baseline the capsule travels toward
    pub toward: Side,
    /// Visual pulse phase (radians)
    pub pulse: f32,
    #[serde(skip)]
    pub consumed: bool,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, center: Vec2, toward: Side, size: f32) -> Self {
        Self {
            id,
            kind,
            rect: Rect::from_center(center, size, size),
            toward,
            pulse: 0.0,
            consumed: false,
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.rect.y += match self.toward {
            Side::Player => speed,
            Side::Opponent => -speed,
        };
        self.pulse = (self.pulse + 0.2) % std::f32::consts::TAU;
    }

    pub fn off_field(&self, field_height: f32) -> bool {
        self.rect.bottom() < 0.0 || self.rect.top() > field_height
    }
}

/// Bricks broken, by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrickTally {
    pub normal: u32,
    pub hard: u32,
    pub permanent: u32,
    pub boss: u32,
    pub moving: u32,
}

impl BrickTally {
    pub fn record(&mut self, kind: BrickKind) {
        self[kind] += 1;
    }

    pub fn total(&self) -> u32 {
        BrickKind::ALL.iter().map(|&k| self[k]).sum()
    }
}

impl Index<BrickKind> for BrickTally {
    type Output = u32;

    fn index(&self, kind: BrickKind) -> &u32 {
        match kind {
            BrickKind::Normal => &self.normal,
            BrickKind::Hard => &self.hard,
            BrickKind::Permanent => &self.permanent,
            BrickKind::Boss => &self.boss,
            BrickKind::Moving => &self.moving,
        }
    }
}

impl IndexMut<BrickKind> for BrickTally {
    fn index_mut(&mut self, kind: BrickKind) -> &mut u32 {
        match kind {
            BrickKind::Normal => &mut self.normal,
            BrickKind::Hard => &mut self.hard,
            BrickKind::Permanent => &mut self.permanent,
            BrickKind::Boss => &mut self.boss,
            BrickKind::Moving => &mut self.moving,
        }
    }
}

/// Per-side statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    /// Bricks broken this round
    pub bricks: BrickTally,
    /// Balls lost this round
    pub balls_lost: u32,
    /// Score of the last completed round
    pub round_score: u32,
    /// Round scores plus bonuses, across the whole match
    pub total_score: u64,
    /// Live arcade points (level-scaled brick value), across the whole match
    pub points: u64,
}

impl SideStats {
    pub fn reset_round(&mut self) {
        self.bricks = BrickTally::default();
        self.balls_lost = 0;
        self.round_score = 0;
    }
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLost { side: Side },
    PaddleHit { side: Side },
    WallHit,
    BrickHit { by: Side, kind: BrickKind },
    BrickDestroyed { by: Side, kind: BrickKind, points: u64 },
    PowerUpSpawned { kind: PowerUpKind, toward: Side },
    PowerUpCollected { kind: PowerUpKind, by: Side },
    BallsMultiplied { count: usize },
    LevelAdvancing { deadline_ms: f64 },
    RoundStarted { round: u32, level: u32 },
    RoundEnded(RoundSummary),
    GameOver { winner: Side },
}

/// Monotonic entity id source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIds {
    next: u32,
}

impl Default for EntityIds {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl EntityIds {
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete match state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Current level (layout tier)
    pub level: u32,
    /// Current round number (1-based)
    pub round: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated milliseconds since the match started
    pub clock_ms: f64,
    pub paddles: Sides<Paddle>,
    pub balls: Vec<Ball>,
    pub bricks: Vec<Brick>,
    pub power_ups: Vec<PowerUp>,
    pub stats: Sides<SideStats>,
    /// Breakable bricks at round start
    pub breakable_at_start: usize,
    /// Set once the breakable count drops below the advance threshold
    pub advance_deadline_ms: Option<f64>,
    /// Clock value of the last ball multiplication (or round start)
    pub last_multiply_ms: f64,
    /// Clock value when the current summary began
    pub summary_started_ms: Option<f64>,
    pub last_summary: Option<RoundSummary>,
    /// Match winner once in `GameOver`
    pub winner: Option<Side>,
    /// Events raised during the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    pub(crate) ids: EntityIds,
}

impl GameState {
    /// Create a match with an explicit seed and start the first round
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        debug_assert!(tuning.validate().is_ok(), "invalid tuning: {:?}", tuning.validate());
        let paddles = Sides::new(
            Paddle::centered(Side::Player, tuning.player_paddle_y(), &tuning),
            Paddle::centered(Side::Opponent, tuning.opponent_paddle_y, &tuning),
        );
        let mut state = Self {
            level: tuning.start_level,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            round: 0,
            time_ticks: 0,
            clock_ms: 0.0,
            paddles,
            balls: Vec::new(),
            bricks: Vec::new(),
            power_ups: Vec::new(),
            stats: Sides::default(),
            breakable_at_start: 0,
            advance_deadline_ms: None,
            last_multiply_ms: 0.0,
            summary_started_ms: None,
            last_summary: None,
            winner: None,
            events: Vec::new(),
            ids: EntityIds::default(),
        };

        super::tick::start_round(&mut state);
        state
    }

    /// Create a match seeded from the thread RNG (no reproducibility)
    pub fn unseeded(tuning: Tuning) -> Self {
        let seed = rand::rng().random::<u64>();
        Self::new(tuning, seed)
    }

    /// Restart from round one at the starting level, keeping tuning and RNG stream
    pub fn new_match(&mut self) {
        self.level = self.tuning.start_level;
        self.round = 0;
        self.stats = Sides::default();
        self.last_summary = None;
        self.winner = None;
        self.phase = GamePhase::Playing;
        super::tick::start_round(self);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.next_id()
    }

    /// Bricks that can still be broken
    pub fn breakable_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_breakable()).count()
    }

    /// Add a ball launched away from `owner`'s paddle
    pub fn spawn_serve_ball(&mut self, owner: Side) {
        let paddle = &self.paddles[owner];
        let gap = self.tuning.ball_radius * 2.0;
        let speed = self.tuning.base_ball_speed;
        let (y, vy) = match owner {
            Side::Player => (paddle.y - gap, -speed),
            Side::Opponent => (paddle.y + paddle.height + gap, speed),
        };
        let vx = if self.rng.random_bool(0.5) { speed } else { -speed };
        let pos = Vec2::new(paddle.center_x(), y);
        let id = self.ids.next_id();
        let radius = self.tuning.ball_radius;
        self.balls
            .push(Ball::new(id, pos, Vec2::new(vx, vy), radius, owner));
    }

    /// Ensure entity lists are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
        self.bricks.sort_by_key(|b| b.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> Tuning {
        Tuning::default()
    }

    #[test]
    fn test_paddle_move_clamps() {
        let t = tuning();
        let mut paddle = Paddle::centered(Side::Player, t.player_paddle_y(), &t);
        paddle.move_by(-5000.0, t.field_width);
        assert_eq!(paddle.x, 0.0);
        assert!(paddle.at_edge(t.field_width));
        paddle.move_by(5000.0, t.field_width);
        assert_eq!(paddle.x + paddle.width, t.field_width);
    }

    #[test]
    fn test_paddle_widen_caps_at_double() {
        let t = tuning();
        let mut paddle = Paddle::centered(Side::Opponent, t.opponent_paddle_y, &t);
        let center = paddle.center_x();
        for _ in 0..10 {
            paddle.widen(1.2, t.field_width);
        }
        assert_eq!(paddle.width, t.paddle_width * 2.0);
        assert!((paddle.center_x() - center).abs() < 0.001);
        paddle.reset_width(t.field_width);
        assert_eq!(paddle.width, t.paddle_width);
    }

    #[test]
    fn test_hard_brick_breaks_on_third_hit() {
        let mut brick = Brick::new(1, BrickKind::Hard, Rect::new(0.0, 0.0, 70.0, 25.0), 0);
        assert!(!brick.hit());
        assert_eq!(brick.hits, 2);
        assert_eq!(brick.color, [205, 0, 0]);
        assert!(!brick.hit());
        assert!(brick.hit());
        assert!(brick.is_destroyed());
        // Further hits are no-ops
        assert!(!brick.hit());
        assert_eq!(brick.hits, 0);
    }

    #[test]
    fn test_permanent_brick_never_breaks() {
        let mut brick = Brick::new(1, BrickKind::Permanent, Rect::new(0.0, 0.0, 70.0, 25.0), 0);
        for _ in 0..100 {
            assert!(!brick.hit());
        }
        assert_eq!(brick.hits, -1);
        assert_eq!(brick.color, BrickKind::Permanent.base_color());
        assert!(!brick.is_breakable());
    }

    #[test]
    fn test_boss_brick_shifts_red() {
        let mut brick = Brick::new(1, BrickKind::Boss, Rect::new(0.0, 0.0, 140.0, 25.0), 6);
        assert_eq!(brick.hits, 12);
        brick.hit();
        assert_eq!(brick.color, [170, 0, 190]);
    }

    #[test]
    fn test_moving_brick_bounces() {
        let mut brick = Brick::new(1, BrickKind::Moving, Rect::new(1.0, 0.0, 70.0, 25.0), 5);
        brick.velocity = -2.0;
        brick.update(1200.0);
        assert_eq!(brick.rect.x, 0.0);
        assert_eq!(brick.velocity, 2.0);

        brick.rect.x = 1129.0;
        brick.update(1200.0);
        assert_eq!(brick.rect.right(), 1200.0);
        assert_eq!(brick.velocity, -2.0);
    }

    #[test]
    fn test_static_brick_does_not_move() {
        let mut brick = Brick::new(1, BrickKind::Normal, Rect::new(10.0, 0.0, 70.0, 25.0), 0);
        brick.velocity = 3.0;
        brick.update(1200.0);
        assert_eq!(brick.rect.x, 10.0);
    }

    #[test]
    fn test_ball_update_clamps_and_trails() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ball = Ball::new(1, Vec2::new(600.0, 400.0), Vec2::new(100.0, -100.0), 10.0, Side::Player);
        for _ in 0..8 {
            ball.update(&mut rng, &t);
            assert!(ball.vel.x.abs() <= t.max_ball_speed());
            assert!(ball.vel.y.abs() <= t.max_ball_speed());
        }
        assert_eq!(ball.trail.len(), t.trail_length);
    }

    #[test]
    fn test_ball_wall_bounce_is_idempotent() {
        let t = tuning();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ball = Ball::new(1, Vec2::new(5.0, 400.0), Vec2::new(-5.0, 5.0), 10.0, Side::Player);
        assert!(ball.bounce_off_walls(&mut rng, &t));
        assert!(ball.vel.x >= 0.0);
        assert!((ball.vel.x - 5.0).abs() <= t.wall_jitter * t.base_ball_speed + 0.001);
        let vel = ball.vel;
        assert!(!ball.bounce_off_walls(&mut rng, &t));
        assert_eq!(ball.vel, vel);
    }

    #[test]
    fn test_power_up_travel_direction() {
        let mut down = PowerUp::new(1, PowerUpKind::Speed, Vec2::new(100.0, 100.0), Side::Player, 20.0);
        down.update(3.0);
        assert_eq!(down.rect.center().y, 103.0);
        let mut up = PowerUp::new(2, PowerUpKind::Slow, Vec2::new(100.0, 5.0), Side::Opponent, 20.0);
        for _ in 0..10 {
            up.update(3.0);
        }
        assert!(up.off_field(800.0));
    }

    #[test]
    fn test_new_state_starts_round() {
        let state = GameState::new(tuning(), 42);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.round, 1);
        assert_eq!(state.balls.len(), 2);
        assert!(state.balls[0].vel.y < 0.0 || state.balls[1].vel.y < 0.0);
        assert!(!state.bricks.is_empty());
        assert_eq!(state.breakable_at_start, state.breakable_count());
    }

    #[test]
    fn test_boss_hits_saturate() {
        assert_eq!(BrickKind::Boss.initial_hits(0), 2);
        assert_eq!(BrickKind::Boss.initial_hits(6), 12);
        assert_eq!(BrickKind::Boss.initial_hits(u32::MAX), i32::MAX);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid tuning")]
    fn test_new_rejects_invalid_tuning() {
        let mut t = tuning();
        t.power_up_chance = 1.5;
        let _ = GameState::new(t, 1);
    }

    #[test]
    fn test_tally_index() {
        let mut tally = BrickTally::default();
        tally.record(BrickKind::Hard);
        tally.record(BrickKind::Hard);
        tally.record(BrickKind::Boss);
        assert_eq!(tally[BrickKind::Hard], 2);
        assert_eq!(tally[BrickKind::Boss], 1);
        assert_eq!(tally.total(), 3);
    }
}
