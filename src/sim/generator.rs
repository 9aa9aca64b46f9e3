//! Maze generation by randomized depth-first carving
//!
//! Algorithm:
//! 1. Start with an all-wall grid and open the entrance
//! 2. Walk an explicit stack: from the top cell pick a random wall cell two
//!    steps away, open it and the cell between, push it; pop when stuck
//! 3. Open the exit region, tunnelling a corridor to it if carving never
//!    reached it
//! 4. Verify with a breadth-first pass and regenerate if the exit is unreachable

use rand::Rng;

use super::direction::Direction;
use super::grid::{CellPos, CellState, Grid, in_exit_region};
use crate::consts::{MAX_GENERATION_ATTEMPTS, MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::error::MazeError;

/// Check a grid size against the supported range
pub fn validate_size(size: usize) -> Result<(), MazeError> {
    if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
        return Err(MazeError::InvalidSize {
            size,
            min: MIN_GRID_SIZE,
            max: MAX_GRID_SIZE,
        });
    }
    Ok(())
}

/// Check that an entrance lies inside the grid and outside the exit region
pub fn validate_entrance(entrance: CellPos, size: usize) -> Result<(), MazeError> {
    let n = size as i32;
    let inside = (0..n).contains(&entrance.col) && (0..n).contains(&entrance.row);
    if !inside || in_exit_region(entrance, size) {
        return Err(MazeError::InvalidEntrance {
            col: entrance.col,
            row: entrance.row,
            size,
        });
    }
    Ok(())
}

/// Generate a solvable `size`x`size` maze
///
/// `entrance` defaults to `CellPos::ENTRANCE`. The result always has a PATH
/// route from the entrance to the exit region, and every PATH cell is
/// reachable from the entrance.
pub fn generate<R: Rng + ?Sized>(
    size: usize,
    entrance: Option<CellPos>,
    rng: &mut R,
) -> Result<Grid, MazeError> {
    validate_size(size)?;
    let entrance = entrance.unwrap_or(CellPos::ENTRANCE);
    validate_entrance(entrance, size)?;

    for attempt in 1..=MAX_GENERATION_ATTEMPTS {
        let mut grid = Grid::filled(size, CellState::Wall, entrance);
        carve(&mut grid, rng);
        open_exit_region(&mut grid);

        if grid.reaches_exit() {
            log::info!(
                "Generated {}x{} maze: {} path cells (attempt {})",
                size,
                size,
                grid.path_count(),
                attempt
            );
            return Ok(grid);
        }
        log::warn!("Maze attempt {} could not reach the exit, regenerating", attempt);
    }

    log::error!(
        "Gave up after {} attempts to generate a solvable {}x{} maze",
        MAX_GENERATION_ATTEMPTS,
        size,
        size
    );
    Err(MazeError::Unsolvable {
        col: entrance.col,
        row: entrance.row,
    })
}

/// Randomized backtracking carve from the grid's entrance
fn carve<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let start = grid.entrance();
    grid.set(start, CellState::Path);
    let mut stack = vec![start];
    let mut candidates: Vec<Direction> = Vec::with_capacity(4);

    while let Some(&current) = stack.last() {
        candidates.clear();
        candidates.extend(Direction::PRIORITY.into_iter().filter(|&dir| {
            let (dc, dr) = dir.delta();
            let dest = current.offset(dc * 2, dr * 2);
            grid.get(dest) == Some(CellState::Wall)
        }));

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let dir = candidates[rng.random_range(0..candidates.len())];
        let between = current.step(dir);
        let dest = between.step(dir);
        grid.set(between, CellState::Path);
        grid.set(dest, CellState::Path);
        stack.push(dest);
    }
}

/// Force the exit region open and connect it to the carved corridors
fn open_exit_region(grid: &mut Grid) {
    let size = grid.size();
    let exits: Vec<CellPos> = grid.exit_cells().collect();

    // Touching means an exit cell is already carved or borders a carved cell
    let touched = exits.iter().any(|&cell| {
        grid.is_path(cell)
            || Direction::PRIORITY
                .into_iter()
                .map(|dir| cell.step(dir))
                .any(|next| !in_exit_region(next, size) && grid.is_path(next))
    });

    for &cell in &exits {
        grid.set(cell, CellState::Path);
    }

    if touched {
        return;
    }

    // Nearest carved cell to the region's corner; row-major scan keeps ties stable
    let anchor = CellPos::new(size as i32 - 2, size as i32 - 2);
    let Some(mut cursor) = grid
        .cells()
        .filter(|(cell, state)| *state == CellState::Path && !in_exit_region(*cell, size))
        .map(|(cell, _)| cell)
        .min_by_key(|cell| cell.manhattan(anchor))
    else {
        return;
    };

    log::debug!("Carving exit corridor from {}", cursor);
    while !in_exit_region(cursor, size) {
        if cursor.col < anchor.col {
            cursor.col += 1;
        } else {
            cursor.row += 1;
        }
        grid.set(cursor, CellState::Path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_rejects_small_and_huge_sizes() {
        let mut rng = Pcg32::seed_from_u64(1);
        for size in [0, 1, 4, MAX_GRID_SIZE + 1] {
            let err = generate(size, None, &mut rng).unwrap_err();
            assert!(matches!(err, MazeError::InvalidSize { .. }), "size {}", size);
        }
    }

    #[test]
    fn test_rejects_bad_entrance() {
        let mut rng = Pcg32::seed_from_u64(1);
        for entrance in [CellPos::new(-1, 1), CellPos::new(0, 5), CellPos::new(3, 4)] {
            let err = generate(5, Some(entrance), &mut rng).unwrap_err();
            assert!(matches!(err, MazeError::InvalidEntrance { .. }));
        }
    }

    #[test]
    fn test_entrance_and_exit_open() {
        let mut rng = Pcg32::seed_from_u64(42);
        let grid = generate(9, None, &mut rng).unwrap();
        assert!(grid.is_path(CellPos::ENTRANCE));
        assert!(grid.exit_cells().all(|c| grid.is_path(c)));
        assert!(grid.reaches_exit());
        assert!(grid.is_connected());
    }

    #[test]
    fn test_same_seed_same_grid() {
        let a = generate(21, None, &mut Pcg32::seed_from_u64(7)).unwrap();
        let b = generate(21, None, &mut Pcg32::seed_from_u64(7)).unwrap();
        let c = generate(21, None, &mut Pcg32::seed_from_u64(8)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_entrance_override() {
        let mut rng = Pcg32::seed_from_u64(3);
        let entrance = CellPos::new(1, 0);
        let grid = generate(8, Some(entrance), &mut rng).unwrap();
        assert_eq!(grid.entrance(), entrance);
        assert!(grid.is_path(entrance));
        assert!(grid.reaches_exit());
    }

    #[test]
    fn test_exit_corridor_connects_isolated_region() {
        // Only a short carved stub far from the exit region
        let mut grid = Grid::filled(7, CellState::Wall, CellPos::ENTRANCE);
        grid.set(CellPos::new(0, 1), CellState::Path);
        grid.set(CellPos::new(1, 1), CellState::Path);
        assert!(!grid.reaches_exit());

        open_exit_region(&mut grid);
        assert!(grid.reaches_exit());
        assert!(grid.is_connected());
        // Horizontal leg along row 1, then down column 5
        assert!(grid.is_path(CellPos::new(5, 1)));
        assert!(grid.is_path(CellPos::new(5, 4)));
        assert!(!grid.is_path(CellPos::new(6, 1)));
    }

    #[test]
    fn test_touching_corridor_left_alone() {
        let mut grid = Grid::filled(5, CellState::Wall, CellPos::ENTRANCE);
        for col in 0..5 {
            grid.set(CellPos::new(col, 1), CellState::Path);
        }
        grid.set(CellPos::new(4, 2), CellState::Path);
        let before = grid.path_count();
        open_exit_region(&mut grid);
        // Only the four exit cells were added
        assert_eq!(grid.path_count(), before + 4);
        assert!(grid.reaches_exit());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_generated_grid_is_solvable(size in MIN_GRID_SIZE..40usize, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let grid = generate(size, None, &mut rng).unwrap();
            prop_assert_eq!(grid.size(), size);
            prop_assert!(grid.is_path(grid.entrance()));
            prop_assert!(grid.exit_cells().all(|c| grid.is_path(c)));
            prop_assert!(grid.reaches_exit());
            prop_assert!(grid.is_connected());
        }
    }
}
