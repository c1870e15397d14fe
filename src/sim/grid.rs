//! Invader formation: construction, march-and-descend movement, random picks
//!
//! The grid owns the invader collection. An empty collection means the wave
//! is cleared; the progression step consumes that, not the grid itself.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::state::{Entity, Invader, Viewport};
use crate::consts::*;
use crate::render::RenderSink;

/// The invader formation
#[derive(Debug, Clone)]
pub struct Grid {
    /// Live invaders; removal is the only way one dies
    pub invaders: Vec<Invader>,
    pub rows: u32,
    pub cols: u32,
    /// Horizontal speed in px/s; the sign is the direction of travel and
    /// flips on boundary contact
    pub velocity: f32,
    /// Pixels the whole formation drops on each boundary contact
    pub descent: f32,
}

impl Grid {
    /// Create an empty formation. Dimensions clamp into the valid range.
    pub fn new(rows: u32, cols: u32, velocity: f32, descent: f32) -> Self {
        Self {
            invaders: Vec::new(),
            rows: rows.clamp(GRID_MIN_DIM, GRID_MAX_DIM),
            cols: cols.clamp(GRID_MIN_DIM, GRID_MAX_DIM),
            velocity,
            descent,
        }
    }

    /// Change dimensions for the next `restart`. Clamps instead of failing.
    pub fn set_dims(&mut self, rows: u32, cols: u32) {
        self.rows = rows.clamp(GRID_MIN_DIM, GRID_MAX_DIM);
        self.cols = cols.clamp(GRID_MIN_DIM, GRID_MAX_DIM);
    }

    /// Repopulate the full rows x cols formation, centered horizontally,
    /// moving rightward at the given base speed.
    pub fn restart(&mut self, velocity: f32, bounds: &Viewport) {
        self.velocity = velocity.abs();
        self.invaders.clear();

        let cell = Vec2::new(
            INVADER_WIDTH + FORMATION_PADDING,
            INVADER_HEIGHT + FORMATION_PADDING,
        );
        let formation_width = self.cols as f32 * cell.x - FORMATION_PADDING;
        let origin = Vec2::new((bounds.width - formation_width) / 2.0, FORMATION_TOP);

        for row in 0..self.rows {
            for col in 0..self.cols {
                let pos = origin + Vec2::new(col as f32 * cell.x, row as f32 * cell.y);
                self.invaders.push(Invader::new(pos, row, col));
            }
        }
    }

    /// Leftmost and rightmost edges of the formation, None when empty
    pub fn horizontal_extent(&self) -> Option<(f32, f32)> {
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for invader in &self.invaders {
            min_x = min_x.min(invader.pos.x);
            max_x = max_x.max(invader.pos.x + INVADER_WIDTH);
        }
        if self.invaders.is_empty() {
            None
        } else {
            Some((min_x, max_x))
        }
    }

    /// March the formation. When the leading edge has reached a screen
    /// boundary, the velocity sign flips and every invader drops by the
    /// descent step before the horizontal move.
    pub fn update(&mut self, dt: f32, bounds: &Viewport) {
        let Some((min_x, max_x)) = self.horizontal_extent() else {
            return;
        };

        let hit_right = max_x >= bounds.width && self.velocity > 0.0;
        let hit_left = min_x <= 0.0 && self.velocity < 0.0;
        if hit_right || hit_left {
            self.velocity = -self.velocity;
            for invader in &mut self.invaders {
                invader.pos.y += self.descent;
            }
        }

        let step = self.velocity * dt;
        for invader in &mut self.invaders {
            invader.pos.x += step;
        }
    }

    /// Uniformly random live invader, for autonomous fire
    pub fn random_invader<R: Rng>(&self, rng: &mut R) -> Option<&Invader> {
        self.invaders.choose(rng)
    }

    /// Wave cleared?
    pub fn is_cleared(&self) -> bool {
        self.invaders.is_empty()
    }

    pub fn draw(&self, sink: &mut dyn RenderSink) {
        for invader in &self.invaders {
            invader.draw(sink);
        }
    }
}
