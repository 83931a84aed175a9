//! The built-in demo level.

use anyhow::Result;

use crate::core::{Field, ScriptedEngine};
use crate::types::{Cell, Difficulty, PursuerColor};

/// Demo maze: `#` wall, `.` dot, `o` pellet, `-` pen gate.
pub const MAZE: [&str; 11] = [
    "#############",
    "#o....#....o#",
    "#.##.###.##.#",
    "#...........#",
    "#.##.#-#.##.#",
    "#....# #....#",
    "#.##.###.##.#",
    "#...........#",
    "#.##.###.##.#",
    "#o....#....o#",
    "#############",
];

pub const PLAYER_START: Cell = Cell::new(7, 6);

pub const LIVES: u8 = 3;

/// Clockwise walk around the rectangle with corners `(y0, x0)` and `(y1, x1)`.
pub fn rect_loop(y0: u32, x0: u32, y1: u32, x1: u32) -> Vec<Cell> {
    let mut path = Vec::new();
    path.extend((x0..x1).map(|x| Cell::new(y0, x)));
    path.extend((y0..y1).map(|y| Cell::new(y, x1)));
    path.extend((x0 + 1..=x1).rev().map(|x| Cell::new(y1, x)));
    path.extend((y0 + 1..=y1).rev().map(|y| Cell::new(y, x0)));
    path
}

/// The demo engine with all four pursuers on patrol.
pub fn engine(difficulty: Difficulty, tick_limit: Option<u64>) -> Result<ScriptedEngine> {
    let field = Field::from_rows(&MAZE)?;
    let mut engine = ScriptedEngine::new(field, difficulty, PLAYER_START, LIVES)?
        .with_pursuer(PursuerColor::Red, rect_loop(3, 1, 7, 11))?
        .with_pursuer(PursuerColor::Pink, rect_loop(1, 1, 3, 4))?
        .with_pursuer(PursuerColor::Cyan, rect_loop(7, 8, 9, 11))?
        .with_pursuer(PursuerColor::Orange, rect_loop(1, 8, 3, 11))?;
    if let Some(limit) = tick_limit {
        engine = engine.with_tick_limit(limit);
    }
    Ok(engine)
}
