//! Maze grid: cell states, entrance, exit region and the derived wall view
//!
//! Cell coordinates are `(col, row)` with rows growing downward. Storage is
//! row-major.

use std::collections::VecDeque;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::cell_to_pixel;
use crate::consts::{ENTRANCE_COL, ENTRANCE_ROW};
use crate::error::MazeError;

/// A discrete grid position (may lie outside the grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellPos {
    pub col: i32,
    pub row: i32,
}

impl CellPos {
    pub const ENTRANCE: CellPos = CellPos {
        col: ENTRANCE_COL,
        row: ENTRANCE_ROW,
    };

    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Offset by a cell delta, saturating at the `i32` range
    pub fn offset(self, d_col: i32, d_row: i32) -> Self {
        Self::new(self.col.saturating_add(d_col), self.row.saturating_add(d_row))
    }

    pub fn step(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        self.offset(dc, dr)
    }

    pub fn manhattan(self, other: CellPos) -> u32 {
        self.col.abs_diff(other.col) + self.row.abs_diff(other.row)
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// State of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Wall,
    Path,
}

/// Whether a cell belongs to the exit region of an `n`x`n` grid
#[inline]
pub fn in_exit_region(cell: CellPos, size: usize) -> bool {
    let n = size as i32;
    cell.row >= n - 2 && cell.col >= n - 2 && cell.row < n && cell.col < n
}

/// Square maze grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    cells: Vec<CellState>,
    entrance: CellPos,
}

impl Grid {
    /// Grid with every cell set to `state`
    pub fn filled(size: usize, state: CellState, entrance: CellPos) -> Self {
        Self {
            size,
            cells: vec![state; size * size],
            entrance,
        }
    }

    /// Build a grid from text rows (`#` = wall, anything else = path)
    ///
    /// Rows must form a square. The entrance and exit region are not forced
    /// open, so hand-drawn grids can describe broken mazes for testing.
    pub fn from_rows(rows: &[&str], entrance: CellPos) -> Result<Self, MazeError> {
        let size = rows.len();
        let mut grid = Self::filled(size, CellState::Wall, entrance);
        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != size {
                return Err(MazeError::InvalidSize {
                    size: line.chars().count(),
                    min: size,
                    max: size,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                if ch != '#' {
                    grid.set(CellPos::new(col as i32, row as i32), CellState::Path);
                }
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn entrance(&self) -> CellPos {
        self.entrance
    }

    #[inline]
    pub fn in_bounds(&self, cell: CellPos) -> bool {
        let n = self.size as i32;
        (0..n).contains(&cell.col) && (0..n).contains(&cell.row)
    }

    #[inline]
    fn index(&self, cell: CellPos) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| cell.row as usize * self.size + cell.col as usize)
    }

    /// State of a cell, `None` outside the grid
    pub fn get(&self, cell: CellPos) -> Option<CellState> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Walkable cell (out of bounds counts as not walkable)
    #[inline]
    pub fn is_path(&self, cell: CellPos) -> bool {
        self.get(cell) == Some(CellState::Path)
    }

    pub(crate) fn set(&mut self, cell: CellPos, state: CellState) {
        if let Some(i) = self.index(cell) {
            self.cells[i] = state;
        }
    }

    pub fn is_exit(&self, cell: CellPos) -> bool {
        in_exit_region(cell, self.size)
    }

    /// Exit region cells in row-major order
    pub fn exit_cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        let lo = self.size.saturating_sub(2) as i32;
        let n = self.size as i32;
        (lo..n).flat_map(move |row| (lo..n).map(move |col| CellPos::new(col, row)))
    }

    /// In-bounds PATH neighbors in `Direction::PRIORITY` order
    pub fn path_neighbors(&self, cell: CellPos) -> impl Iterator<Item = (Direction, CellPos)> + '_ {
        Direction::PRIORITY
            .into_iter()
            .map(move |dir| (dir, cell.step(dir)))
            .filter(|(_, next)| self.is_path(*next))
    }

    /// Breadth-first reachability over PATH cells, row-major flags
    pub fn reachable_from(&self, start: CellPos) -> Vec<bool> {
        let mut seen = vec![false; self.cells.len()];
        let Some(start_idx) = self.index(start).filter(|_| self.is_path(start)) else {
            return seen;
        };
        seen[start_idx] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for (_, next) in self.path_neighbors(cell) {
                if let Some(i) = self.index(next) {
                    if !seen[i] {
                        seen[i] = true;
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    /// True if any exit cell is reachable from the entrance
    pub fn reaches_exit(&self) -> bool {
        let seen = self.reachable_from(self.entrance);
        self.exit_cells()
            .filter_map(|cell| self.index(cell))
            .any(|i| seen[i])
    }

    /// True if every PATH cell is reachable from the entrance
    pub fn is_connected(&self) -> bool {
        let seen = self.reachable_from(self.entrance);
        self.cells
            .iter()
            .zip(seen)
            .all(|(state, reached)| *state == CellState::Wall || reached)
    }

    pub fn path_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == CellState::Path).count()
    }

    /// Row-major iterator over all cells
    pub fn cells(&self) -> impl Iterator<Item = (CellPos, CellState)> + '_ {
        self.cells.iter().enumerate().map(|(i, state)| {
            let pos = CellPos::new((i % self.size) as i32, (i / self.size) as i32);
            (pos, *state)
        })
    }

    /// Derived wall view in pixel space
    pub fn walls(&self, cell_size: f32) -> Walls {
        let rects = self
            .cells()
            .filter(|(_, state)| *state == CellState::Wall)
            .map(|(cell, _)| {
                let min = cell_to_pixel(cell, cell_size);
                WallRect {
                    cell,
                    min,
                    max: min + Vec2::splat(cell_size),
                }
            })
            .collect();
        Walls { rects, cell_size }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                let ch = match self.cells[row * self.size + col] {
                    CellState::Wall => '#',
                    CellState::Path => '.',
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Pixel bounds of one WALL cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallRect {
    pub cell: CellPos,
    pub min: Vec2,
    pub max: Vec2,
}

impl WallRect {
    /// Half-open containment test
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

/// Read-only list of wall bounds, computed once per grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Walls {
    rects: Vec<WallRect>,
    cell_size: f32,
}

impl Walls {
    pub fn iter(&self) -> impl Iterator<Item = &WallRect> {
        self.rects.iter()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Wall containing the given pixel, if any
    pub fn wall_at(&self, p: Vec2) -> Option<&WallRect> {
        self.rects.iter().find(|r| r.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Grid {
        Grid::from_rows(
            &["#####", "....#", "###.#", "#....", "#.#.."],
            CellPos::ENTRANCE,
        )
        .unwrap()
    }

    #[test]
    fn test_offset_saturates() {
        let cell = CellPos::new(1, 1);
        assert_eq!(cell.offset(i32::MAX, 0), CellPos::new(i32::MAX, 1));
        assert_eq!(cell.offset(0, i32::MIN), CellPos::new(1, i32::MIN + 1));
        assert_eq!(CellPos::new(-5, 0).offset(i32::MIN, 0).col, i32::MIN);
    }

    #[test]
    fn test_exit_region_bounds() {
        assert!(in_exit_region(CellPos::new(3, 3), 5));
        assert!(in_exit_region(CellPos::new(4, 4), 5));
        assert!(!in_exit_region(CellPos::new(2, 4), 5));
        assert!(!in_exit_region(CellPos::new(5, 5), 5));

        let grid = Grid::filled(6, CellState::Path, CellPos::ENTRANCE);
        let exits: Vec<_> = grid.exit_cells().collect();
        assert_eq!(
            exits,
            vec![
                CellPos::new(4, 4),
                CellPos::new(5, 4),
                CellPos::new(4, 5),
                CellPos::new(5, 5)
            ]
        );
    }

    #[test]
    fn test_from_rows_and_lookup() {
        let grid = corridor();
        assert_eq!(grid.size(), 5);
        assert!(grid.is_path(CellPos::new(0, 1)));
        assert!(!grid.is_path(CellPos::new(4, 1)));
        assert_eq!(grid.get(CellPos::new(-1, 1)), None);
        assert_eq!(grid.get(CellPos::new(0, 0)), Some(CellState::Wall));
        assert_eq!(grid.to_string().lines().nth(1), Some("....#"));
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let err = Grid::from_rows(&["###", "..", "###"], CellPos::ENTRANCE).unwrap_err();
        assert!(matches!(err, MazeError::InvalidSize { .. }));
    }

    #[test]
    fn test_reachability() {
        let grid = corridor();
        assert!(grid.reaches_exit());
        assert!(grid.is_connected());

        let blocked = Grid::from_rows(
            &["#####", "....#", "#####", "#....", "#.#.."],
            CellPos::ENTRANCE,
        )
        .unwrap();
        assert!(!blocked.reaches_exit());
        assert!(!blocked.is_connected());
    }

    #[test]
    fn test_neighbors_follow_priority() {
        let grid = Grid::filled(5, CellState::Path, CellPos::ENTRANCE);
        let dirs: Vec<_> = grid.path_neighbors(CellPos::new(2, 2)).map(|(d, _)| d).collect();
        assert_eq!(dirs, Direction::PRIORITY.to_vec());

        // Corner only has in-bounds neighbors
        let dirs: Vec<_> = grid.path_neighbors(CellPos::new(0, 0)).map(|(d, _)| d).collect();
        assert_eq!(dirs, vec![Direction::Right, Direction::Down]);
    }

    #[test]
    fn test_walls_view() {
        let grid = corridor();
        let walls = grid.walls(10.0);
        assert_eq!(walls.len(), 25 - grid.path_count());
        let wall = walls.wall_at(Vec2::new(45.0, 15.0)).unwrap();
        assert_eq!(wall.cell, CellPos::new(4, 1));
        assert!(walls.wall_at(Vec2::new(5.0, 15.0)).is_none());
    }
}
