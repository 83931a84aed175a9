//! Core types module - shared data structures and constants
//!
//! This module defines the plain data exchanged between the game engine and the
//! presentation layer. All types are pure data with no external dependencies,
//! so they can be used by the engine, the renderer and tests alike.
//!
//! # Timing Constants
//!
//! Rates are in events per second:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_TICK_RATE` | 5 | Simulation ticks per second |
//! | `DEFAULT_RENDER_RATE` | 20 | Rendered sub-frames per second |
//!
//! # Atlas Layout
//!
//! The sprite atlas is a grid of `SPRITE_SIZE` squares separated by a 2px gap
//! with a 1px lead-in on both axes:
//!
//! | Row | Contents |
//! |-----|----------|
//! | 0 | Player mouth frames (column 2 is closed) |
//! | 1-4 | Pursuers by [`PursuerColor`] |
//! | 5 | Frightened pursuer |
//!
//! # Examples
//!
//! ```
//! use tui_pacman_types::{Cell, Heading};
//!
//! let heading = Heading::from_key_code("ArrowRight");
//! assert_eq!(heading, Some(Heading::Right));
//! assert_eq!(heading.unwrap().vector(), (0, 1));
//!
//! let next = Cell::new(15, 15).step(Heading::Right);
//! assert_eq!(next, Some(Cell::new(15, 16)));
//! ```

/// Simulation ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 5;

/// Rendered sub-frames per second.
pub const DEFAULT_RENDER_RATE: u32 = 20;

/// Side length of one sprite in the atlas, in atlas pixels.
pub const SPRITE_SIZE: u32 = 14;

/// Leading margin before the first sprite on each atlas axis.
pub const ATLAS_LEAD_IN: u32 = 1;

/// Gap between two neighbouring sprites in the atlas.
pub const ATLAS_GAP: u32 = 2;

/// Atlas row holding the player frames.
pub const PLAYER_ROW: u32 = 0;

/// Atlas row used for every vulnerable pursuer.
pub const FRIGHTENED_ROW: u32 = 5;

/// Player mouth frames, cycled every sub-frame.
pub const PLAYER_MOUTH_FRAMES: u32 = 3;

/// Player column shown when standing still.
pub const PLAYER_CLOSED_COLUMN: u32 = 2;

/// Pursuer body frames, cycled every sub-frame.
pub const PURSUER_FRAMES: u32 = 2;

/// Pursuer base column shown when standing still.
pub const PURSUER_IDLE_COLUMN: u32 = 6;

/// Number of pursuer footprints remembered per pursuer.
pub const FOOTPRINT_HISTORY: usize = 4;

/// Points for eating a dot.
pub const SCORE_DOT: u32 = 10;

/// Points for eating a pellet.
pub const SCORE_PELLET: u32 = 50;

/// Points for eating a vulnerable pursuer.
pub const SCORE_PURSUER: u32 = 200;

/// Static content of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum CellType {
    #[default]
    Empty = 0,
    Wall = 1,
    Dot = 2,
    Pellet = 3,
    Gate = 4,
}

impl CellType {
    /// Parse one character of an ASCII maze.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_pacman_types::CellType;
    ///
    /// assert_eq!(CellType::from_char('#'), Some(CellType::Wall));
    /// assert_eq!(CellType::from_char('.'), Some(CellType::Dot));
    /// assert_eq!(CellType::from_char('?'), None);
    /// ```
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            ' ' => Some(CellType::Empty),
            '#' => Some(CellType::Wall),
            '.' => Some(CellType::Dot),
            'o' => Some(CellType::Pellet),
            '-' => Some(CellType::Gate),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            CellType::Empty => ' ',
            CellType::Wall => '#',
            CellType::Dot => '.',
            CellType::Pellet => 'o',
            CellType::Gate => '-',
        }
    }

    pub fn is_wall(&self) -> bool {
        matches!(self, CellType::Wall)
    }

    /// Dots and pellets, the cells the engine consumes.
    pub fn is_edible(&self) -> bool {
        matches!(self, CellType::Dot | CellType::Pellet)
    }
}

/// Axis-aligned direction an entity moved as of its last tick.
///
/// The discriminants double as the rotation index (`heading * 90°`, clockwise
/// in screen space) and as the pursuer atlas column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Heading {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
    #[default]
    None = 99,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    /// Map a raw input code to a heading.
    ///
    /// Unrecognised codes return `None` (the Option), which callers ignore.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_pacman_types::Heading;
    ///
    /// assert_eq!(Heading::from_key_code("KeyW"), Some(Heading::Up));
    /// assert_eq!(Heading::from_key_code("ArrowLeft"), Some(Heading::Left));
    /// assert_eq!(Heading::from_key_code("Space"), None);
    /// ```
    pub fn from_key_code(code: &str) -> Option<Self> {
        match code {
            "ArrowRight" | "KeyD" => Some(Heading::Right),
            "ArrowLeft" | "KeyA" => Some(Heading::Left),
            "ArrowUp" | "KeyW" => Some(Heading::Up),
            "ArrowDown" | "KeyS" => Some(Heading::Down),
            _ => None,
        }
    }

    /// Unit step as `(dy, dx)`.
    pub fn vector(&self) -> (i32, i32) {
        match self {
            Heading::Up => (-1, 0),
            Heading::Down => (1, 0),
            Heading::Left => (0, -1),
            Heading::Right => (0, 1),
            Heading::None => (0, 0),
        }
    }

    /// Quarter turns clockwise from the sprite's base (right-facing) orientation.
    ///
    /// `None` has no orientation and is drawn unrotated.
    pub fn quarter_turns(&self) -> u32 {
        match self {
            Heading::None => 0,
            other => *other as u32,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Heading::Up => Heading::Down,
            Heading::Down => Heading::Up,
            Heading::Left => Heading::Right,
            Heading::Right => Heading::Left,
            Heading::None => Heading::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Heading::None)
    }
}

/// Grid coordinate as `(y, x)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    pub y: u32,
    pub x: u32,
}

impl Cell {
    pub const fn new(y: u32, x: u32) -> Self {
        Self { y, x }
    }

    /// The neighbouring cell one step along `heading`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    /// Upper bounds are the caller's concern.
    pub fn step(self, heading: Heading) -> Option<Self> {
        let (dy, dx) = heading.vector();
        let y = self.y.checked_add_signed(dy)?;
        let x = self.x.checked_add_signed(dx)?;
        Some(Self { y, x })
    }

    /// Heading that leads from `self` to an orthogonally adjacent `to`.
    ///
    /// Non-adjacent or identical cells yield [`Heading::None`].
    pub fn heading_to(self, to: Cell) -> Heading {
        Heading::ALL
            .into_iter()
            .find(|h| self.step(*h) == Some(to))
            .unwrap_or(Heading::None)
    }
}

impl From<(u32, u32)> for Cell {
    fn from(value: (u32, u32)) -> Self {
        Cell::new(value.0, value.1)
    }
}

/// Pursuer palette; the discriminant is the pursuer's atlas row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PursuerColor {
    Red = 1,
    Pink = 2,
    Cyan = 3,
    Orange = 4,
}

impl PursuerColor {
    pub const ALL: [PursuerColor; 4] = [
        PursuerColor::Red,
        PursuerColor::Pink,
        PursuerColor::Cyan,
        PursuerColor::Orange,
    ];

    pub fn atlas_row(&self) -> u32 {
        *self as u32
    }
}

/// What kind of moving entity this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Pursuer(PursuerColor),
}

/// Engine difficulty, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Normal,
    Expert,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(Difficulty::Normal),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }
}

/// Engine-owned snapshot of a moving entity.
///
/// `cell` and `prev_cell` are written once per tick by the engine; the
/// renderer only reads them. `heading` is the direction taken from
/// `prev_cell` during the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MovingEntity {
    pub id: u32,
    pub cell: Cell,
    pub prev_cell: Cell,
    pub heading: Heading,
    pub kind: EntityKind,
    pub vulnerable: bool,
}

impl MovingEntity {
    /// A stationary player at `cell`.
    pub fn player(cell: Cell) -> Self {
        Self {
            id: 0,
            cell,
            prev_cell: cell,
            heading: Heading::None,
            kind: EntityKind::Player,
            vulnerable: false,
        }
    }

    /// A stationary pursuer at `cell`.
    pub fn pursuer(id: u32, color: PursuerColor, cell: Cell) -> Self {
        Self {
            id,
            cell,
            prev_cell: cell,
            heading: Heading::None,
            kind: EntityKind::Pursuer(color),
            vulnerable: false,
        }
    }

    /// Record a completed move from `prev_cell` to `cell`.
    pub fn moved(mut self, prev_cell: Cell, cell: Cell) -> Self {
        self.prev_cell = prev_cell;
        self.cell = cell;
        self.heading = prev_cell.heading_to(cell);
        self
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_discriminants_match_rotation_index() {
        assert_eq!(Heading::Right.quarter_turns(), 0);
        assert_eq!(Heading::Down.quarter_turns(), 1);
        assert_eq!(Heading::Left.quarter_turns(), 2);
        assert_eq!(Heading::Up.quarter_turns(), 3);
        assert_eq!(Heading::None.quarter_turns(), 0);
    }

    #[test]
    fn unknown_key_codes_are_ignored() {
        assert_eq!(Heading::from_key_code("Enter"), None);
        assert_eq!(Heading::from_key_code(""), None);
        assert_eq!(Heading::from_key_code("arrowright"), None);
    }

    #[test]
    fn step_does_not_underflow() {
        assert_eq!(Cell::new(0, 0).step(Heading::Up), None);
        assert_eq!(Cell::new(0, 0).step(Heading::Left), None);
        assert_eq!(Cell::new(0, 0).step(Heading::None), Some(Cell::new(0, 0)));
    }

    #[test]
    fn heading_to_adjacent_cells() {
        let c = Cell::new(5, 5);
        assert_eq!(c.heading_to(Cell::new(4, 5)), Heading::Up);
        assert_eq!(c.heading_to(Cell::new(6, 5)), Heading::Down);
        assert_eq!(c.heading_to(Cell::new(5, 4)), Heading::Left);
        assert_eq!(c.heading_to(Cell::new(5, 6)), Heading::Right);
        assert_eq!(c.heading_to(c), Heading::None);
        assert_eq!(c.heading_to(Cell::new(7, 5)), Heading::None);
    }

    #[test]
    fn moved_derives_heading() {
        let e = MovingEntity::player(Cell::new(15, 15)).moved(Cell::new(15, 15), Cell::new(15, 16));
        assert_eq!(e.heading, Heading::Right);
        assert_eq!(e.prev_cell, Cell::new(15, 15));
    }

    #[test]
    fn pursuer_rows_follow_palette() {
        let rows: Vec<u32> = PursuerColor::ALL.iter().map(|c| c.atlas_row()).collect();
        assert_eq!(rows, vec![1, 2, 3, 4]);
        assert!(rows.iter().all(|r| *r != PLAYER_ROW && *r != FRIGHTENED_ROW));
    }

    #[test]
    fn maze_chars_round_trip() {
        for t in [
            CellType::Empty,
            CellType::Wall,
            CellType::Dot,
            CellType::Pellet,
            CellType::Gate,
        ] {
            assert_eq!(CellType::from_char(t.as_char()), Some(t));
        }
    }
}
