//! Fixed timestep clock
//!
//! Hosts own the frame loop. Each frame they report the elapsed time and run
//! as many fixed ticks as the clock hands back, one `advance` per tick.

use crate::consts::{MAX_SUBSTEPS, TICK_DT};

/// Longest frame the clock will account for (seconds)
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct StepClock {
    accumulator: f32,
    tick_dt: f32,
    max_substeps: u32,
    /// Total ticks handed out
    pub ticks: u64,
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new(TICK_DT, MAX_SUBSTEPS)
    }
}

impl StepClock {
    pub fn new(tick_dt: f32, max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            tick_dt,
            max_substeps: max_substeps.max(1),
            ticks: 0,
        }
    }

    pub fn tick_dt(&self) -> f32 {
        self.tick_dt
    }

    /// Account for `frame_dt` seconds and return the number of ticks to run
    ///
    /// Long frames are clamped and the substep count is capped to prevent a
    /// spiral of death; leftover time carries into the next frame.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        if self.tick_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.tick_dt && substeps < self.max_substeps {
            self.accumulator -= self.tick_dt;
            substeps += 1;
        }
        if substeps == self.max_substeps {
            // Drop the backlog rather than carry it forward forever
            self.accumulator = self.accumulator.min(self.tick_dt);
        }
        self.ticks += substeps as u64;
        substeps
    }
}
