//! ASCII renderer
//!
//! `#` wall, `.` path, `E` exit region, `@` actor (nearest cell to its
//! continuous position).

use glam::Vec2;

use super::Renderer;
use crate::pixel_to_cell;
use crate::sim::{ActorState, CellPos, CellState, Grid, Walls};

#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    rows: Vec<Vec<char>>,
    cell_size: f32,
    actor: Option<CellPos>,
    /// Number of `actor_moved` notifications received
    pub frames: u64,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current picture, one line per grid row
    pub fn frame(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * (self.rows.len() + 1));
        for (row, line) in self.rows.iter().enumerate() {
            for (col, ch) in line.iter().enumerate() {
                if self.actor == Some(CellPos::new(col as i32, row as i32)) {
                    out.push('@');
                } else {
                    out.push(*ch);
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Renderer for TextRenderer {
    fn grid_built(&mut self, grid: &Grid, walls: &Walls, cell_size: f32) {
        let n = grid.size();
        self.cell_size = cell_size;
        self.rows = vec![vec!['.'; n]; n];
        for wall in walls.iter() {
            self.rows[wall.cell.row as usize][wall.cell.col as usize] = '#';
        }
        for cell in grid.exit_cells() {
            if grid.get(cell) == Some(CellState::Path) {
                self.rows[cell.row as usize][cell.col as usize] = 'E';
            }
        }
        self.actor = Some(grid.entrance());
    }

    fn actor_moved(&mut self, actor: &ActorState) {
        self.frames += 1;
        if self.cell_size > 0.0 {
            // Sample the glyph centre so a half-crossed cell shows the nearer one
            let centre = actor.position + Vec2::splat(self.cell_size / 2.0);
            self.actor = Some(pixel_to_cell(centre, self.cell_size));
        }
    }
}
