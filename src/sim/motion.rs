//! Tick-driven actor motion
//!
//! A move request names a target cell; each `advance` slides the actor's
//! continuous position one step toward it (x axis first, then y), checking
//! the footprint against the grid after every increment. The move settles
//! through its `MoveHandle` on a later tick, never synchronously.
//!
//! Only one move may be in flight. Requests made while moving are rejected
//! with `MoveError::Busy` rather than queued.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::check_footprint;
use super::direction::Direction;
use super::grid::{CellPos, Grid};
use crate::cell_to_pixel;
use crate::error::MoveError;

/// Motion state machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotionPhase {
    /// No move in flight
    Idle,
    /// A move is in flight
    Moving,
    /// The last move hit a wall; cleared by the next request or advance
    Blocked,
    /// The exit region has been reached (terminal for the maze instance)
    Succeeded,
}

/// What a single `advance` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    /// Nothing in flight
    Idle,
    /// Position changed, target not yet reached
    Moved,
    /// The in-flight move hit a wall or left the grid
    Blocked { target: CellPos },
    /// The in-flight move was cancelled through its handle
    Cancelled,
    /// The actor settled on its target
    Arrived { cell: CellPos },
    /// The actor settled inside the exit region for the first time
    Succeeded { cell: CellPos },
}

impl MotionEvent {
    /// Whether the actor's continuous position may have changed
    pub fn moved_actor(&self) -> bool {
        !matches!(self, MotionEvent::Idle)
    }
}

/// Actor position, owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Last settled cell
    pub cell: CellPos,
    /// Continuous top-left pixel position
    pub position: Vec2,
    /// Destination of the in-flight move
    pub target: Option<CellPos>,
}

impl ActorState {
    /// Actor resting on `cell`
    pub fn at(cell: CellPos, cell_size: f32) -> Self {
        Self {
            cell,
            position: cell_to_pixel(cell, cell_size),
            target: None,
        }
    }
}

/// Move counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStats {
    pub requested: u32,
    pub completed: u32,
    pub blocked: u32,
    pub cancelled: u32,
    pub rejected_busy: u32,
}

/// Settlement slot shared between the controller and a handle
#[derive(Debug, Default)]
struct MoveSlot {
    outcome: Option<Result<CellPos, MoveError>>,
    cancel_requested: bool,
    waker: Option<Waker>,
}

fn settle(slot: &Rc<RefCell<MoveSlot>>, outcome: Result<CellPos, MoveError>) {
    let waker = {
        let mut slot = slot.borrow_mut();
        if slot.outcome.is_some() {
            return;
        }
        slot.outcome = Some(outcome);
        slot.waker.take()
    };
    if let Some(waker) = waker {
        waker.wake();
    }
}

/// Completion handle for one move request
///
/// Resolves with the settled cell or rejects with a `MoveError`. Await it
/// from an executor, or check `status()` from a frame loop.
#[derive(Debug)]
pub struct MoveHandle {
    slot: Rc<RefCell<MoveSlot>>,
    target: CellPos,
}

impl MoveHandle {
    pub fn target(&self) -> CellPos {
        self.target
    }

    /// Outcome if settled
    pub fn status(&self) -> Option<Result<CellPos, MoveError>> {
        self.slot.borrow().outcome
    }

    pub fn is_settled(&self) -> bool {
        self.slot.borrow().outcome.is_some()
    }

    /// Ask the controller to abandon this move at its next advance
    pub fn cancel(&self) {
        self.slot.borrow_mut().cancel_requested = true;
    }
}

impl Future for MoveHandle {
    type Output = Result<CellPos, MoveError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match slot.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                slot.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

struct InFlight {
    target: CellPos,
    slot: Rc<RefCell<MoveSlot>>,
}

/// Owns the grid used for collision and the actor moving through it
pub struct MotionController {
    grid: Grid,
    cell_size: f32,
    actor: ActorState,
    phase: MotionPhase,
    in_flight: Option<InFlight>,
    succeeded: bool,
    stats: MoveStats,
}

impl MotionController {
    pub fn new(grid: Grid, cell_size: f32) -> Self {
        let actor = ActorState::at(grid.entrance(), cell_size);
        Self {
            grid,
            cell_size,
            actor,
            phase: MotionPhase::Idle,
            in_flight: None,
            succeeded: false,
            stats: MoveStats::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn actor(&self) -> &ActorState {
        &self.actor
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    pub fn stats(&self) -> &MoveStats {
        &self.stats
    }

    /// Whether the exit region has ever been reached
    pub fn has_succeeded(&self) -> bool {
        self.succeeded
    }

    /// Phase to fall back to when nothing is in flight
    fn resting_phase(&self) -> MotionPhase {
        if self.succeeded {
            MotionPhase::Succeeded
        } else {
            MotionPhase::Idle
        }
    }

    /// Start a move by `(d_col, d_row)` cells from the settled cell
    pub fn request_move(&mut self, d_col: i32, d_row: i32) -> Result<MoveHandle, MoveError> {
        if d_col == 0 && d_row == 0 {
            return Err(MoveError::NoMovement);
        }
        if self.phase == MotionPhase::Moving {
            self.stats.rejected_busy += 1;
            log::debug!("Move ({}, {}) rejected: busy", d_col, d_row);
            return Err(MoveError::Busy);
        }

        let target = self.actor.cell.offset(d_col, d_row);
        let slot = Rc::new(RefCell::new(MoveSlot::default()));
        self.in_flight = Some(InFlight {
            target,
            slot: Rc::clone(&slot),
        });
        self.actor.target = Some(target);
        self.phase = MotionPhase::Moving;
        self.stats.requested += 1;
        log::debug!("Move {} -> {}", self.actor.cell, target);

        Ok(MoveHandle { slot, target })
    }

    /// Start a single-cell move in `dir`
    pub fn request_direction(&mut self, dir: Direction) -> Result<MoveHandle, MoveError> {
        let (dc, dr) = dir.delta();
        self.request_move(dc, dr)
    }

    /// Advance the in-flight move by one step of at most `step_size` pixels
    ///
    /// Steps are capped at one cell so the footprint can never skip over a
    /// wall. Non-positive steps make no progress.
    pub fn advance(&mut self, step_size: f32) -> MotionEvent {
        match self.phase {
            MotionPhase::Moving => {}
            MotionPhase::Blocked => {
                self.phase = self.resting_phase();
                return MotionEvent::Idle;
            }
            MotionPhase::Idle | MotionPhase::Succeeded => return MotionEvent::Idle,
        }

        let Some((target, cancel_requested)) = self
            .in_flight
            .as_ref()
            .map(|f| (f.target, f.slot.borrow().cancel_requested))
        else {
            self.phase = self.resting_phase();
            return MotionEvent::Idle;
        };

        if cancel_requested {
            self.abort(MoveError::Cancelled);
            self.phase = self.resting_phase();
            return MotionEvent::Cancelled;
        }

        let step = step_size.min(self.cell_size);
        let goal = cell_to_pixel(target, self.cell_size);
        let pos = &mut self.actor.position;
        if step > 0.0 {
            if pos.x != goal.x {
                pos.x = approach(pos.x, goal.x, step);
            } else if pos.y != goal.y {
                pos.y = approach(pos.y, goal.y, step);
            }
        }

        let collision = check_footprint(&self.grid, self.actor.position, self.cell_size);
        if collision.hit {
            log::debug!(
                "Move to {} blocked at {} ({})",
                target,
                collision.cell,
                if collision.out_of_bounds { "out of bounds" } else { "wall" }
            );
            self.abort(MoveError::OutOfBounds {
                col: target.col,
                row: target.row,
            });
            self.stats.blocked += 1;
            self.phase = MotionPhase::Blocked;
            return MotionEvent::Blocked { target };
        }

        if self.actor.position != goal {
            return MotionEvent::Moved;
        }

        self.finish(target)
    }

    /// Settle the in-flight move on its target and check the win condition
    fn finish(&mut self, target: CellPos) -> MotionEvent {
        self.actor.cell = target;
        self.actor.position = cell_to_pixel(target, self.cell_size);
        self.actor.target = None;
        if let Some(flight) = self.in_flight.take() {
            settle(&flight.slot, Ok(target));
        }
        self.stats.completed += 1;

        if self.grid.is_exit(target) && !self.succeeded {
            self.succeeded = true;
            self.phase = MotionPhase::Succeeded;
            log::info!("Exit reached at {} after {} moves", target, self.stats.completed);
            return MotionEvent::Succeeded { cell: target };
        }

        self.phase = self.resting_phase();
        MotionEvent::Arrived { cell: target }
    }

    /// Reject the in-flight move and snap back to the settled cell
    fn abort(&mut self, error: MoveError) {
        if let Some(flight) = self.in_flight.take() {
            settle(&flight.slot, Err(error));
            if error == MoveError::Cancelled {
                self.stats.cancelled += 1;
            }
        }
        self.actor.position = cell_to_pixel(self.actor.cell, self.cell_size);
        self.actor.target = None;
    }

    /// Return the actor to the entrance, cancelling any in-flight move
    ///
    /// The success signal is not re-armed: a maze instance signals success
    /// at most once.
    pub fn reset(&mut self) {
        self.abort(MoveError::Cancelled);
        self.actor = ActorState::at(self.grid.entrance(), self.cell_size);
        self.phase = MotionPhase::Idle;
        log::debug!("Actor reset to {}", self.actor.cell);
    }
}

impl Drop for MotionController {
    fn drop(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            settle(&flight.slot, Err(MoveError::Cancelled));
        }
    }
}

/// Move `current` toward `goal` by `step`, landing exactly on `goal`
#[inline]
fn approach(current: f32, goal: f32, step: f32) -> f32 {
    let remaining = goal - current;
    if remaining.abs() <= step {
        goal
    } else {
        current + step * remaining.signum()
    }
}
