//! Brick layout generation
//!
//! Each level picks one of five patterns by `level % 5`. Brick toughness
//! creeps up with the level, a boss brick appears on every third level after
//! the third, and later levels mix in sliding bricks.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Brick, BrickKind, EntityIds};
use crate::tuning::Tuning;

/// Brick layout pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    Standard,
    Checkerboard,
    Fortress,
    Triangle,
    Circular,
}

impl Layout {
    pub fn for_level(level: u32) -> Self {
        match level % 5 {
            0 => Layout::Standard,
            1 => Layout::Checkerboard,
            2 => Layout::Fortress,
            3 => Layout::Triangle,
            _ => Layout::Circular,
        }
    }
}

/// Per-cell inclusion probability for the standard layout
const STANDARD_FILL: f64 = 0.85;
/// Interior fill probability for the fortress layout
const FORTRESS_INTERIOR_FILL: f64 = 0.6;

/// Whether `level` carries a boss brick
pub fn has_boss(level: u32) -> bool {
    level > 3 && level % 3 == 0
}

/// Normal/hard/permanent weights that shift toward tougher bricks with level
pub fn standard_weights(level: u32) -> [(BrickKind, u32); 3] {
    let l = level.min(1000);
    [
        (BrickKind::Normal, 50u32.saturating_sub(5 * l).max(10)),
        (BrickKind::Hard, 30 + 2 * l),
        (BrickKind::Permanent, 20 + l),
    ]
}

/// Weighted pick among brick kinds
fn pick_kind(rng: &mut impl Rng, weights: &[(BrickKind, u32)]) -> BrickKind {
    match WeightedIndex::new(weights.iter().map(|&(_, w)| w)) {
        Ok(dist) => weights[dist.sample(rng)].0,
        Err(e) => {
            log::warn!("Bad brick weights {:?}: {}", weights, e);
            BrickKind::Normal
        }
    }
}

/// Cell placement for the brick grid
struct Grid {
    rows: usize,
    cols: usize,
    offset_x: f32,
    top: f32,
    cell_w: f32,
    cell_h: f32,
    gap: f32,
}

impl Grid {
    fn new(tuning: &Tuning) -> Self {
        Self {
            rows: tuning.brick_rows,
            cols: tuning.brick_cols,
            offset_x: (tuning.field_width - tuning.grid_width()) / 2.0,
            top: tuning.brick_top_margin,
            cell_w: tuning.brick_width,
            cell_h: tuning.brick_height,
            gap: tuning.brick_gap,
        }
    }

    fn cell(&self, row: usize, col: usize) -> Rect {
        Rect::new(
            self.offset_x + col as f32 * (self.cell_w + self.gap),
            self.top + row as f32 * (self.cell_h + self.gap),
            self.cell_w,
            self.cell_h,
        )
    }

    fn is_border(&self, row: usize, col: usize) -> bool {
        row == 0 || col == 0 || row == self.rows - 1 || col == self.cols - 1
    }

    /// The middle cell of each of the four sides
    fn is_side_midpoint(&self, row: usize, col: usize) -> bool {
        let mid_row = self.rows / 2;
        let mid_col = self.cols / 2;
        ((row == 0 || row == self.rows - 1) && col == mid_col)
            || ((col == 0 || col == self.cols - 1) && row == mid_row)
    }

    /// Boss brick rectangle: double width, centered in the grid
    fn boss_rect(&self, field_width: f32) -> Rect {
        let w = self.cell_w * 2.0;
        let grid_h = self.rows as f32 * (self.cell_h + self.gap) - self.gap;
        Rect::new(
            (field_width - w) / 2.0,
            self.top + (grid_h - self.cell_h) / 2.0,
            w,
            self.cell_h,
        )
    }
}

/// Choose the kind for one cell, or `None` to leave it empty
fn cell_kind(
    layout: Layout,
    level: u32,
    grid: &Grid,
    row: usize,
    col: usize,
    rng: &mut impl Rng,
) -> Option<BrickKind> {
    match layout {
        Layout::Standard => rng
            .random_bool(STANDARD_FILL)
            .then(|| pick_kind(rng, &standard_weights(level))),

        Layout::Checkerboard => {
            if (row + col) % 2 != 0 {
                return None;
            }
            let kind = if grid.is_border(row, col) {
                pick_kind(rng, &[(BrickKind::Normal, 70), (BrickKind::Hard, 30)])
            } else {
                pick_kind(
                    rng,
                    &[
                        (BrickKind::Normal, 50),
                        (BrickKind::Hard, 40),
                        (BrickKind::Permanent, 10),
                    ],
                )
            };
            Some(kind)
        }

        Layout::Fortress => {
            if grid.is_border(row, col) {
                if grid.is_side_midpoint(row, col) {
                    // Guaranteed way in on every side
                    return Some(BrickKind::Normal);
                }
                Some(pick_kind(
                    rng,
                    &[
                        (BrickKind::Normal, 10),
                        (BrickKind::Hard, 30),
                        (BrickKind::Permanent, 60),
                    ],
                ))
            } else {
                rng.random_bool(FORTRESS_INTERIOR_FILL).then(|| {
                    pick_kind(rng, &[(BrickKind::Normal, 60), (BrickKind::Hard, 40)])
                })
            }
        }

        Layout::Triangle => {
            let cols = grid.cols as isize;
            let (r, c) = (row as isize, col as isize);
            let lo = (cols - r - 1).div_euclid(2);
            let hi = (cols + r + 1).div_euclid(2);
            (lo <= c && c < hi).then(|| pick_kind(rng, &standard_weights(level)))
        }

        Layout::Circular => {
            let center_row = (grid.rows as f32 - 1.0) / 2.0;
            let center_col = (grid.cols as f32 - 1.0) / 2.0;
            let max_radius = grid.rows.min(grid.cols) as f32 / 2.0;
            let d = ((row as f32 - center_row).powi(2) + (col as f32 - center_col).powi(2)).sqrt();
            if d > max_radius {
                None
            } else if d < max_radius / 3.0 {
                Some(BrickKind::Permanent)
            } else if d < 2.0 * max_radius / 3.0 {
                Some(BrickKind::Hard)
            } else {
                Some(BrickKind::Normal)
            }
        }
    }
}

/// Generate the brick layout for `level`
pub fn generate(level: u32, tuning: &Tuning, rng: &mut impl Rng, ids: &mut EntityIds) -> Vec<Brick> {
    let layout = Layout::for_level(level);
    let grid = Grid::new(tuning);
    let boss = has_boss(level).then(|| grid.boss_rect(tuning.field_width));
    let moving_allowed = level >= tuning.moving_brick_min_level;

    let mut bricks = Vec::with_capacity(grid.rows * grid.cols + 1);
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let Some(mut kind) = cell_kind(layout, level, &grid, row, col, rng) else {
                continue;
            };
            let rect = grid.cell(row, col);
            if boss.is_some_and(|b| b.intersects(&rect)) {
                continue;
            }

            if moving_allowed && kind == BrickKind::Normal && rng.random_bool(tuning.moving_brick_chance) {
                kind = BrickKind::Moving;
            }
            let mut brick = Brick::new(ids.next_id(), kind, rect, level);
            if kind == BrickKind::Moving {
                let dir = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
                brick.velocity = dir * tuning.moving_brick_speed;
            }
            bricks.push(brick);
        }
    }

    if let Some(rect) = boss {
        bricks.push(Brick::new(ids.next_id(), BrickKind::Boss, rect, level));
    }

    log::info!(
        "Level {} ({:?}): {} bricks, {} breakable{}",
        level,
        layout,
        bricks.len(),
        bricks.iter().filter(|b| b.is_breakable()).count(),
        if boss.is_some() { ", boss" } else { "" }
    );

    bricks
}
