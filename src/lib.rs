//! Gridwalk - solvable grid mazes with tick-driven movement
//!
//! Core modules:
//! - `sim`: Deterministic maze logic (generation, solution encoding, motion)
//! - `renderer`: Renderer notifications and a text renderer
//! - `config`: Construction-time configuration
//! - `error`: Error taxonomy shared by all of the above

pub mod config;
pub mod error;
pub mod renderer;
pub mod sim;

pub use config::{Difficulty, MazeConfig};
pub use error::{ConfigError, MazeError, MoveError};

use glam::Vec2;

use sim::CellPos;

/// Maze configuration constants
pub mod consts {
    /// Smallest grid that keeps entrance and exit region apart
    pub const MIN_GRID_SIZE: usize = 5;
    /// Largest supported grid (cell coordinates stay well inside i32)
    pub const MAX_GRID_SIZE: usize = 255;
    pub const DEFAULT_GRID_SIZE: usize = 15;

    /// Default entrance cell (col, row)
    pub const ENTRANCE_COL: i32 = 0;
    pub const ENTRANCE_ROW: i32 = 1;

    /// Host view width in pixels; cell size is `view_width / n`
    pub const DEFAULT_VIEW_WIDTH: f32 = 600.0;
    /// Gap between the actor glyph and its cell edge
    pub const DEFAULT_ACTOR_MARGIN: f32 = 4.0;
    /// Ticks needed to cross one cell at the default step size
    pub const STEPS_PER_CELL: u32 = 8;

    /// Fixed simulation timestep (60 Hz)
    pub const TICK_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Carve passes tried before giving up on a solvable grid
    pub const MAX_GENERATION_ATTEMPTS: u32 = 16;
}

/// Tolerance when snapping pixel coordinates back onto cell boundaries
const SNAP_EPSILON: f32 = 1e-4;

/// Cell edge length in pixels for a view of the given width
#[inline]
pub fn cell_size(view_width: f32, grid_size: usize) -> f32 {
    view_width / grid_size.max(1) as f32
}

/// Top-left pixel position of a cell
#[inline]
pub fn cell_to_pixel(cell: CellPos, cell_size: f32) -> Vec2 {
    Vec2::new(cell.col as f32 * cell_size, cell.row as f32 * cell_size)
}

/// Pixel coordinate expressed in cell units, snapped onto whole cells when
/// float error leaves it a hair off a boundary
#[inline]
pub fn pixel_to_units(px: f32, cell_size: f32) -> f32 {
    let units = px / cell_size;
    let rounded = units.round();
    if (units - rounded).abs() < SNAP_EPSILON {
        rounded
    } else {
        units
    }
}

/// Cell containing the given pixel position (top-left anchored)
#[inline]
pub fn pixel_to_cell(pos: Vec2, cell_size: f32) -> CellPos {
    CellPos::new(
        pixel_to_units(pos.x, cell_size).floor() as i32,
        pixel_to_units(pos.y, cell_size).floor() as i32,
    )
}
