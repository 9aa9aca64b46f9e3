//! Renderer notifications
//!
//! The maze core tells a renderer what to draw and never reads anything back.
//! Pixel rendering lives outside this crate; `TextRenderer` draws ASCII for
//! the demo binary and logs.

pub mod text;

pub use text::TextRenderer;

use crate::sim::{ActorState, Grid, Walls};

/// Passive drawing surface for a maze instance
pub trait Renderer {
    /// The grid is final; draw every wall as an opaque `cell_size` square
    fn grid_built(&mut self, grid: &Grid, walls: &Walls, cell_size: f32);

    /// The actor's continuous position changed
    fn actor_moved(&mut self, actor: &ActorState);
}

/// Renderer that draws nothing (headless use)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn grid_built(&mut self, _grid: &Grid, _walls: &Walls, _cell_size: f32) {}

    fn actor_moved(&mut self, _actor: &ActorState) {}
}
