//! Solution path search and run-length encoding
//!
//! The canonical solution is the breadth-first shortest path from a start
//! cell to the nearest exit cell, expanding neighbors in
//! `Direction::PRIORITY` order so equal-length ties always resolve the same
//! way for a given grid.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::grid::{CellPos, Grid};
use crate::error::MazeError;

/// One run of identical moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeStep {
    pub direction: Direction,
    pub count: u32,
}

/// Run-length encoded solution path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeCode {
    steps: Vec<CodeStep>,
}

impl MazeCode {
    /// Compress a direction sequence, preserving order
    pub fn from_directions<I: IntoIterator<Item = Direction>>(dirs: I) -> Self {
        let mut steps: Vec<CodeStep> = Vec::new();
        for direction in dirs {
            match steps.last_mut() {
                Some(last) if last.direction == direction => last.count += 1,
                _ => steps.push(CodeStep { direction, count: 1 }),
            }
        }
        Self { steps }
    }

    pub fn steps(&self) -> &[CodeStep] {
        &self.steps
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of single-cell moves
    pub fn total_moves(&self) -> u32 {
        self.steps.iter().map(|s| s.count).sum()
    }

    /// Single-cell moves in order
    pub fn expand(&self) -> impl Iterator<Item = Direction> + '_ {
        self.steps
            .iter()
            .flat_map(|s| std::iter::repeat_n(s.direction, s.count as usize))
    }

    /// Cell reached by following the code from `start`
    pub fn apply(&self, start: CellPos) -> CellPos {
        self.expand().fold(start, CellPos::step)
    }
}

impl fmt::Display for MazeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{}", step.direction.as_char(), step.count)?;
        }
        Ok(())
    }
}

/// Shortest PATH route from `from` to the nearest exit cell, both ends included
pub fn shortest_path(grid: &Grid, from: CellPos) -> Result<Vec<CellPos>, MazeError> {
    let unsolvable = MazeError::Unsolvable {
        col: from.col,
        row: from.row,
    };
    if !grid.is_path(from) {
        return Err(unsolvable);
    }

    let size = grid.size();
    let index = |cell: CellPos| cell.row as usize * size + cell.col as usize;
    let mut parent: Vec<Option<CellPos>> = vec![None; size * size];
    let mut seen = vec![false; size * size];
    seen[index(from)] = true;

    let mut queue = VecDeque::from([from]);
    while let Some(cell) = queue.pop_front() {
        if grid.is_exit(cell) {
            let mut path = vec![cell];
            let mut cursor = cell;
            while let Some(prev) = parent[index(cursor)] {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return Ok(path);
        }
        for (_, next) in grid.path_neighbors(cell) {
            let i = index(next);
            if !seen[i] {
                seen[i] = true;
                parent[i] = Some(cell);
                queue.push_back(next);
            }
        }
    }

    Err(unsolvable)
}

/// Canonical solution code from `entrance`
pub fn encode(grid: &Grid, entrance: CellPos) -> Result<MazeCode, MazeError> {
    let path = shortest_path(grid, entrance)?;
    let dirs = path.windows(2).filter_map(|pair| {
        Direction::from_delta(pair[1].col - pair[0].col, pair[1].row - pair[0].row)
    });
    let code = MazeCode::from_directions(dirs);
    log::debug!("Encoded solution from {}: {}", entrance, code);
    Ok(code)
}

/// First run of the solution from an arbitrary cell; `None` once in the exit region
pub fn hint(grid: &Grid, from: CellPos) -> Result<Option<CodeStep>, MazeError> {
    Ok(encode(grid, from)?.steps().first().copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generator::generate;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sample() -> Grid {
        Grid::from_rows(
            &["#####", "....#", "###.#", "#....", "#.#.."],
            CellPos::ENTRANCE,
        )
        .unwrap()
    }

    #[test]
    fn test_run_length_encoding() {
        use Direction::*;
        let code = MazeCode::from_directions([Right, Right, Down, Down, Down, Right, Up]);
        assert_eq!(
            code.steps(),
            &[
                CodeStep { direction: Right, count: 2 },
                CodeStep { direction: Down, count: 3 },
                CodeStep { direction: Right, count: 1 },
                CodeStep { direction: Up, count: 1 },
            ]
        );
        assert_eq!(code.total_moves(), 7);
        assert_eq!(code.to_string(), "R2 D3 R1 U1");
        assert!(MazeCode::from_directions([]).is_empty());
    }

    #[test]
    fn test_encode_sample() {
        let grid = sample();
        let code = encode(&grid, CellPos::ENTRANCE).unwrap();
        // (0,1) -> (3,1) -> (3,3), first exit cell reached
        assert_eq!(code.to_string(), "R3 D2");
        assert_eq!(code.apply(CellPos::ENTRANCE), CellPos::new(3, 3));
    }

    #[test]
    fn test_tie_break_prefers_right_then_down() {
        // Open 5x5: every monotone path is equally short
        let grid = Grid::from_rows(
            &[".....", ".....", ".....", ".....", "....."],
            CellPos::new(0, 0),
        )
        .unwrap();
        let code = encode(&grid, CellPos::new(0, 0)).unwrap();
        assert_eq!(code.to_string(), "R3 D3");
    }

    #[test]
    fn test_unsolvable_grid() {
        let grid = Grid::from_rows(
            &["#####", "....#", "#####", "#....", "#.#.."],
            CellPos::ENTRANCE,
        )
        .unwrap();
        let err = encode(&grid, CellPos::ENTRANCE).unwrap_err();
        assert_eq!(err, MazeError::Unsolvable { col: 0, row: 1 });

        // Starting on a wall is also unsolvable
        assert!(shortest_path(&grid, CellPos::new(0, 0)).is_err());
    }

    #[test]
    fn test_hint_from_midway_and_exit() {
        let grid = sample();
        let step = hint(&grid, CellPos::new(3, 1)).unwrap().unwrap();
        assert_eq!(step, CodeStep { direction: Direction::Down, count: 2 });
        assert_eq!(hint(&grid, CellPos::new(4, 4)).unwrap(), None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_code_walks_to_exit(size in 5usize..32, seed in any::<u64>()) {
            let grid = generate(size, None, &mut Pcg32::seed_from_u64(seed)).unwrap();
            let code = encode(&grid, grid.entrance()).unwrap();

            let mut cell = grid.entrance();
            for dir in code.expand() {
                cell = cell.step(dir);
                prop_assert!(grid.is_path(cell), "crossed wall at {}", cell);
            }
            prop_assert!(grid.is_exit(cell));

            // Deterministic on repeated calls
            prop_assert_eq!(encode(&grid, grid.entrance()).unwrap(), code);
        }
    }
}
