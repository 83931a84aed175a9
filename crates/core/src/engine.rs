//! The game engine seam.
//!
//! The presentation layer never simulates anything itself. It reads snapshots
//! from a [`GameEngine`] and asks it to advance one tick at a time.

use crate::field::Field;
use crate::types::{Cell, CellType, Difficulty, MovingEntity};

/// Opaque game-state collaborator driven by the frame loop.
pub trait GameEngine {
    /// Advance the simulation one step. Returns `true` once the game is over.
    fn tick(&mut self) -> bool;

    fn is_game_over(&self) -> bool;

    fn difficulty(&self) -> Difficulty;

    /// The static maze, including engine-side dot consumption.
    fn field(&self) -> &Field;

    fn width(&self) -> u32 {
        self.field().width()
    }

    fn height(&self) -> u32 {
        self.field().height()
    }

    /// Cell type at `(y, x)`; out-of-range reads as empty.
    fn field_at(&self, y: u32, x: u32) -> CellType {
        self.field().at(Cell::new(y, x))
    }

    fn player(&self) -> MovingEntity;

    fn pursuers(&self) -> &[MovingEntity];

    /// Apply a raw input code such as `"ArrowLeft"` or `"KeyW"`.
    ///
    /// Unrecognised codes are ignored. Only the most recent heading is kept.
    fn set_heading(&mut self, code: &str);

    fn score(&self) -> u32;

    fn lives_remaining(&self) -> u8;
}
