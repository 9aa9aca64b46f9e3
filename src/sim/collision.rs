//! Collision detection for the actor footprint
//!
//! The actor occupies one cell-sized square anchored at its top-left pixel
//! position. While it slides between cells the square overlaps two cells on
//! the moving axis, and every overlapped cell must be in bounds and PATH.
//! Queries run against the grid, never against rendered geometry.

use std::ops::RangeInclusive;

use glam::Vec2;

use super::grid::{CellPos, Grid};
use crate::pixel_to_units;

/// Result of a footprint check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResult {
    /// Whether the footprint touched a wall or left the grid
    pub hit: bool,
    /// First offending cell in row-major order (if hit)
    pub cell: CellPos,
    /// The offending cell lies outside the grid rather than on a wall
    pub out_of_bounds: bool,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            cell: CellPos::default(),
            out_of_bounds: false,
        }
    }
}

/// Cell span covered along one axis by a cell-sized extent starting at `px`
fn axis_span(px: f32, cell_size: f32) -> RangeInclusive<i32> {
    let units = pixel_to_units(px, cell_size);
    units.floor() as i32..=units.ceil() as i32
}

/// Cells overlapped by the actor footprint at `pos`
pub fn footprint(pos: Vec2, cell_size: f32) -> impl Iterator<Item = CellPos> {
    let cols = axis_span(pos.x, cell_size);
    let rows = axis_span(pos.y, cell_size);
    rows.flat_map(move |row| cols.clone().map(move |col| CellPos::new(col, row)))
}

/// Check the actor footprint at `pos` against grid bounds and walls
pub fn check_footprint(grid: &Grid, pos: Vec2, cell_size: f32) -> CollisionResult {
    for cell in footprint(pos, cell_size) {
        if !grid.in_bounds(cell) {
            return CollisionResult {
                hit: true,
                cell,
                out_of_bounds: true,
            };
        }
        if !grid.is_path(cell) {
            return CollisionResult {
                hit: true,
                cell,
                out_of_bounds: false,
            };
        }
    }
    CollisionResult::miss()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_to_pixel;

    fn grid() -> Grid {
        Grid::from_rows(
            &["#####", "...##", "###.#", "#....", "#.#.."],
            CellPos::ENTRANCE,
        )
        .unwrap()
    }

    #[test]
    fn test_aligned_footprint_is_single_cell() {
        let cells: Vec<_> = footprint(cell_to_pixel(CellPos::new(2, 3), 10.0), 10.0).collect();
        assert_eq!(cells, vec![CellPos::new(2, 3)]);
    }

    #[test]
    fn test_sliding_footprint_spans_two_cells() {
        let pos = Vec2::new(12.5, 10.0);
        let cells: Vec<_> = footprint(pos, 10.0).collect();
        assert_eq!(cells, vec![CellPos::new(1, 1), CellPos::new(2, 1)]);
    }

    #[test]
    fn test_open_corridor_misses() {
        let grid = grid();
        assert_eq!(
            check_footprint(&grid, Vec2::new(15.0, 10.0), 10.0),
            CollisionResult::miss()
        );
    }

    #[test]
    fn test_wall_hit_on_first_step() {
        let grid = grid();
        // Sliding right from (2,1) into the wall at (3,1)
        let result = check_footprint(&grid, Vec2::new(21.0, 10.0), 10.0);
        assert!(result.hit);
        assert!(!result.out_of_bounds);
        assert_eq!(result.cell, CellPos::new(3, 1));
    }

    #[test]
    fn test_leaving_grid_is_out_of_bounds() {
        let grid = grid();
        let result = check_footprint(&grid, Vec2::new(-2.0, 10.0), 10.0);
        assert!(result.hit);
        assert!(result.out_of_bounds);
        assert_eq!(result.cell, CellPos::new(-1, 1));
    }
}
