//! Maze instance
//!
//! Owns the grid (through the motion controller), its solution code, the
//! renderer and the success callback. A new maze is a new instance; only the
//! actor can be reset.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::direction::Direction;
use super::encoder::{self, CodeStep, MazeCode};
use super::generator;
use super::grid::{CellPos, Grid, Walls};
use super::motion::{ActorState, MotionController, MotionEvent, MotionPhase, MoveHandle, MoveStats};
use crate::config::MazeConfig;
use crate::error::{MazeError, MoveError};
use crate::renderer::{NullRenderer, Renderer};

pub struct Maze {
    seed: Option<u64>,
    step_size: f32,
    code: MazeCode,
    walls: Walls,
    motion: MotionController,
    renderer: Box<dyn Renderer>,
    on_success: Option<Box<dyn FnMut()>>,
    /// Ticks advanced since construction
    pub time_ticks: u64,
}

impl Maze {
    /// Generate a fresh maze from `config`
    pub fn new(config: &MazeConfig) -> Result<Self, MazeError> {
        config.validate_view()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = generator::generate(config.grid_size, config.entrance_override, &mut rng)?;
        log::info!("Maze seed {}", seed);
        Self::build(grid, config, Some(seed))
    }

    /// Wrap an existing grid (hand-drawn levels, tests)
    ///
    /// The instance reports `config.seed` as its seed, which is `None` unless
    /// the caller set one; the grid was not generated from it.
    pub fn from_grid(grid: Grid, config: &MazeConfig) -> Result<Self, MazeError> {
        config.validate_view()?;
        generator::validate_size(grid.size())?;
        generator::validate_entrance(grid.entrance(), grid.size())?;
        Self::build(grid, config, config.seed)
    }

    fn build(grid: Grid, config: &MazeConfig, seed: Option<u64>) -> Result<Self, MazeError> {
        let cell_size = crate::cell_size(config.view_width, grid.size());
        let code = encoder::encode(&grid, grid.entrance()).inspect_err(|e| {
            log::error!("Solution encoding failed on a finished grid: {}", e);
        })?;
        let walls = grid.walls(cell_size);

        Ok(Self {
            seed,
            step_size: config.effective_step(),
            code,
            walls,
            motion: MotionController::new(grid, cell_size),
            renderer: Box::new(NullRenderer),
            on_success: None,
            time_ticks: 0,
        })
    }

    /// Attach a renderer and tell it the grid is built
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self.renderer
            .grid_built(self.motion.grid(), &self.walls, self.motion.cell_size());
        self.renderer.actor_moved(self.motion.actor());
        self
    }

    /// Callback run exactly once, when the exit region is first reached
    pub fn on_success(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    /// Generation seed; `None` for a wrapped grid built without one
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn grid(&self) -> &Grid {
        self.motion.grid()
    }

    pub fn walls(&self) -> &Walls {
        &self.walls
    }

    /// Canonical solution from the entrance, stable for the instance
    pub fn code(&self) -> &MazeCode {
        &self.code
    }

    pub fn actor(&self) -> &ActorState {
        self.motion.actor()
    }

    pub fn phase(&self) -> MotionPhase {
        self.motion.phase()
    }

    pub fn stats(&self) -> &MoveStats {
        self.motion.stats()
    }

    pub fn cell_size(&self) -> f32 {
        self.motion.cell_size()
    }

    pub fn step_size(&self) -> f32 {
        self.step_size
    }

    pub fn request_move(&mut self, d_col: i32, d_row: i32) -> Result<MoveHandle, MoveError> {
        self.motion.request_move(d_col, d_row)
    }

    pub fn request_direction(&mut self, dir: Direction) -> Result<MoveHandle, MoveError> {
        self.motion.request_direction(dir)
    }

    /// Advance one tick at the configured step size
    pub fn tick(&mut self) -> MotionEvent {
        self.advance(self.step_size)
    }

    /// Advance one tick by `step_size` pixels
    pub fn advance(&mut self, step_size: f32) -> MotionEvent {
        self.time_ticks += 1;
        let event = self.motion.advance(step_size);
        if event.moved_actor() {
            self.renderer.actor_moved(self.motion.actor());
        }
        if let MotionEvent::Succeeded { .. } = event {
            if let Some(callback) = self.on_success.as_mut() {
                callback();
            }
        }
        event
    }

    /// Return the actor to the entrance without regenerating the grid
    pub fn reset(&mut self) {
        self.motion.reset();
        self.renderer.actor_moved(self.motion.actor());
    }

    /// Next run of moves toward the exit from the actor's settled cell
    pub fn hint(&self) -> Result<Option<CodeStep>, MazeError> {
        encoder::hint(self.grid(), self.actor().cell)
    }

    pub fn is_exit(&self, cell: CellPos) -> bool {
        self.grid().is_exit(cell)
    }
}
