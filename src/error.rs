//! Error taxonomy
//!
//! `MazeError` is fatal to maze construction. `MoveError` is an expected,
//! recoverable outcome of a single move request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Construction-time failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MazeError {
    /// Grid too small (entrance and exit region would overlap) or too large
    #[error("invalid grid size {size}: must be between {min} and {max}")]
    InvalidSize { size: usize, min: usize, max: usize },

    /// Entrance outside the grid or inside the exit region
    #[error("invalid entrance ({col}, {row}) for a {size}x{size} grid")]
    InvalidEntrance { col: i32, row: i32, size: usize },

    /// No walkable route to the exit region (generator invariant violated)
    #[error("no path from ({col}, {row}) to the exit region")]
    Unsolvable { col: i32, row: i32 },

    /// View width must be a positive, finite pixel count
    #[error("invalid view width {width}: must be finite and greater than zero")]
    InvalidViewWidth { width: f32 },
}

/// Why a move handle was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MoveError {
    /// The actor touched a wall or left the grid on its way to the target
    #[error("move to ({col}, {row}) hit a wall or left the grid")]
    OutOfBounds { col: i32, row: i32 },

    /// Another move is still in flight
    #[error("a move is already in flight")]
    Busy,

    /// Abandoned through `reset()` or `MoveHandle::cancel()`
    #[error("move cancelled")]
    Cancelled,

    /// Zero-length move request
    #[error("move request has no direction")]
    NoMovement,
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
