//! Deterministic maze module
//!
//! All puzzle logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Fixed neighbor order (right, down, left, up)
//! - Fixed step per tick, driven by the host's clock
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod direction;
pub mod encoder;
pub mod generator;
pub mod grid;
pub mod motion;
pub mod state;

pub use clock::StepClock;
pub use collision::{CollisionResult, check_footprint, footprint};
pub use direction::Direction;
pub use encoder::{CodeStep, MazeCode, encode, hint, shortest_path};
pub use generator::generate;
pub use grid::{CellPos, CellState, Grid, WallRect, Walls, in_exit_region};
pub use motion::{ActorState, MotionController, MotionEvent, MotionPhase, MoveHandle, MoveStats};
pub use state::Maze;
